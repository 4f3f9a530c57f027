use crate::config::types::CrawlConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<CrawlConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: CrawlConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
roots = ["D", "N05"]
delay-ms = 2000
max-codes = 50
cache-dir = "/tmp/atc-cache"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.roots, vec!["D".to_string(), "N05".to_string()]);
        assert_eq!(config.delay_ms, 2000);
        assert_eq!(config.max_codes, Some(50));
        assert_eq!(config.cache_dir.to_str(), Some("/tmp/atc-cache"));
        // Unspecified fields fall back to defaults
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.roots.len(), 14);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_config_with_invalid_root() {
        let file = create_temp_config(r#"roots = ["d01"]"#);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_load_config_rejects_unknown_field() {
        let file = create_temp_config(r#"no-such-field = 1"#);
        assert!(load_config(file.path()).is_err());
    }
}
