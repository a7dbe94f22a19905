/// Grid configuration
///
/// Options are plain data with serde defaults so callers can embed them in
/// their own settings files, or read them from the environment the same way
/// the CLI does.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_EXPORT_FILENAME: &str = "export";

pub const PAGE_SIZE_ENV: &str = "GRID_PAGE_SIZE";
pub const EXPORT_FILENAME_ENV: &str = "GRID_EXPORT_FILENAME";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Rows per page. Zero is rejected by `validate`.
    pub page_size: usize,
    /// Base name of exported files, without extension.
    pub export_filename: String,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            page_size: DEFAULT_PAGE_SIZE,
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl GridOptions {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_export_filename(mut self, name: impl Into<String>) -> Self {
        self.export_filename = name.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        if self.export_filename.trim().is_empty() {
            return Err(GridError::InvalidSetting {
                name: "export_filename".to_string(),
                value: self.export_filename.clone(),
            });
        }
        Ok(())
    }

    /// Defaults overridden by `GRID_PAGE_SIZE` and `GRID_EXPORT_FILENAME`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = GridOptions::default();

        if let Some(raw) = lookup(PAGE_SIZE_ENV) {
            options.page_size = raw.trim().parse().map_err(|_| GridError::InvalidSetting {
                name: PAGE_SIZE_ENV.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(name) = lookup(EXPORT_FILENAME_ENV) {
            options.export_filename = name;
        }

        options.validate()?;
        log::info!(
            "grid options: page_size={} export_filename={}",
            options.page_size,
            options.export_filename
        );
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let options = GridOptions::default();
        assert_eq!(options.page_size, 10);
        assert_eq!(options.export_filename, "export");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let options = GridOptions::default().with_page_size(0);
        assert_eq!(options.validate(), Err(GridError::InvalidPageSize));
    }

    #[test]
    fn test_env_overrides() {
        let options = GridOptions::from_lookup(lookup(&[
            (PAGE_SIZE_ENV, " 25 "),
            (EXPORT_FILENAME_ENV, "pesquisas"),
        ]))
        .unwrap();
        assert_eq!(options.page_size, 25);
        assert_eq!(options.export_filename, "pesquisas");
    }

    #[test]
    fn test_env_garbage_page_size() {
        let err = GridOptions::from_lookup(lookup(&[(PAGE_SIZE_ENV, "ten")])).unwrap_err();
        assert!(matches!(err, GridError::InvalidSetting { .. }));

        let err = GridOptions::from_lookup(lookup(&[(PAGE_SIZE_ENV, "0")])).unwrap_err();
        assert_eq!(err, GridError::InvalidPageSize);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: GridOptions = serde_json::from_str(r#"{"page_size": 50}"#).unwrap();
        assert_eq!(options.page_size, 50);
        assert_eq!(options.export_filename, DEFAULT_EXPORT_FILENAME);
    }
}
