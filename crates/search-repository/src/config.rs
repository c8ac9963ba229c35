//! Repository configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::SortDirection;

/// Settings that scope and shape every request a repository issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Target index names. Fixed for the lifetime of the repository.
    pub indices: Vec<String>,

    /// Entity property used when a page request carries no sort (default: `"dateTime"`).
    #[serde(default = "default_sort_property")]
    pub default_sort_property: String,

    /// Direction of the fallback sort (default: ascending).
    #[serde(default)]
    pub default_sort_direction: SortDirection,

    /// Upper bound on hits requested by unpaged fetches (default: 10000).
    ///
    /// Matches Elasticsearch's default `index.max_result_window`.
    #[serde(default = "default_max_result_window")]
    pub max_result_window: u32,
}

fn default_sort_property() -> String {
    "dateTime".to_string()
}

fn default_max_result_window() -> u32 {
    10000
}

impl RepositoryConfig {
    /// Creates a configuration for the given indices with default settings.
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: indices.into_iter().map(Into::into).collect(),
            default_sort_property: default_sort_property(),
            default_sort_direction: SortDirection::default(),
            max_result_window: default_max_result_window(),
        }
    }

    /// Sets the fallback sort.
    pub fn with_default_sort(
        mut self,
        property: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        self.default_sort_property = property.into();
        self.default_sort_direction = direction;
        self
    }

    /// Sets the unpaged fetch window.
    pub fn with_max_result_window(mut self, window: u32) -> Self {
        self.max_result_window = window;
        self
    }

    /// Checks the configuration for values no request could be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indices.is_empty() {
            return Err(ConfigError::NoIndices);
        }
        if let Some(position) = self.indices.iter().position(|i| i.trim().is_empty()) {
            return Err(ConfigError::EmptyIndexName { position });
        }
        if self.max_result_window == 0 {
            return Err(ConfigError::ZeroResultWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RepositoryConfig::new(["events"]);
        assert_eq!(config.indices, vec!["events"]);
        assert_eq!(config.default_sort_property, "dateTime");
        assert_eq!(config.default_sort_direction, SortDirection::Ascending);
        assert_eq!(config.max_result_window, 10000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: RepositoryConfig =
            serde_json::from_str(r#"{"indices":["events-2024","events-2025"]}"#).unwrap();
        assert_eq!(config.indices.len(), 2);
        assert_eq!(config.default_sort_property, "dateTime");
        assert_eq!(config.max_result_window, 10000);
    }

    #[test]
    fn test_validate_rejects_empty_indices() {
        let config = RepositoryConfig::new(Vec::<String>::new());
        assert!(matches!(config.validate(), Err(ConfigError::NoIndices)));
    }

    #[test]
    fn test_validate_rejects_blank_index_name() {
        let config = RepositoryConfig::new(["events", " "]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyIndexName { position: 1 })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = RepositoryConfig::new(["events"]).with_max_result_window(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroResultWindow)
        ));
    }
}
