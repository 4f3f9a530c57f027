use crate::config::types::CrawlConfig;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Runs before any I/O: a validation failure aborts the invocation with no
/// partial output.
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_roots(&config.roots)?;

    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", config.base_url, e)))?;
    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}': scheme must be http or https",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if let Some(0) = config.max_codes {
        return Err(ConfigError::Validation(
            "max_codes must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the root code set
///
/// Every root must be non-empty and consist only of uppercase letters and
/// digits.
pub fn validate_roots(roots: &[String]) -> Result<(), ConfigError> {
    if roots.is_empty() {
        return Err(ConfigError::Validation(
            "at least one root code is required".to_string(),
        ));
    }

    for root in roots {
        if root.is_empty()
            || !root
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        {
            return Err(ConfigError::InvalidRoot(root.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_roots(roots: &[&str]) -> CrawlConfig {
        CrawlConfig {
            roots: roots.iter().map(|s| s.to_string()).collect(),
            ..CrawlConfig::default()
        }
    }

    #[test]
    fn test_validate_default_config() {
        assert!(validate(&CrawlConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_roots_accepts_codes() {
        assert!(validate_roots(&["D".to_string()]).is_ok());
        assert!(validate_roots(&["D01A".to_string(), "N05".to_string()]).is_ok());
    }

    #[test]
    fn test_validate_roots_rejects_lowercase() {
        assert!(matches!(
            validate_roots(&["d01".to_string()]),
            Err(ConfigError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_validate_roots_rejects_punctuation() {
        assert!(validate_roots(&["D01-A".to_string()]).is_err());
        assert!(validate_roots(&["D 01".to_string()]).is_err());
        assert!(validate_roots(&["".to_string()]).is_err());
    }

    #[test]
    fn test_validate_roots_rejects_empty_set() {
        assert!(matches!(
            validate_roots(&[]),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = config_with_roots(&["D"]);
        config.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.base_url = "ftp://example.com/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = config_with_roots(&["D"]);
        config.max_attempts = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let mut config = config_with_roots(&["D"]);
        config.max_codes = Some(0);
        assert!(validate(&config).is_err());
    }
}
