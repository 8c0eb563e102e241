//! Configuration validation.

use crate::config::{ClassifierModelConfig, Config};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_classifiers(config)?;
    validate_reference(config)?;
    validate_pipeline(config)?;
    validate_deadline_budget(config)?;
    Ok(())
}

fn validate_classifiers(config: &Config) -> Result<()> {
    let classifiers = &config.classifiers;

    validate_endpoint("classifiers.endpoint", &classifiers.endpoint)?;
    validate_timeout("classifiers.timeout_secs", classifiers.timeout_secs)?;

    for (tier, model) in [
        ("primary", &classifiers.primary),
        ("backup_1", &classifiers.backup_1),
        ("backup_2", &classifiers.backup_2),
    ] {
        validate_model(tier, model)?;
    }

    Ok(())
}

fn validate_model(tier: &str, model: &ClassifierModelConfig) -> Result<()> {
    if model.model.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: format!("classifiers.{tier}.model must not be empty"),
        });
    }
    Ok(())
}

fn validate_reference(config: &Config) -> Result<()> {
    if config.reference.enabled {
        validate_endpoint("reference.endpoint", &config.reference.endpoint)?;
        validate_timeout("reference.timeout_secs", config.reference.timeout_secs)?;
    }
    Ok(())
}

fn validate_pipeline(config: &Config) -> Result<()> {
    validate_timeout(
        "pipeline.fetch_timeout_secs",
        config.pipeline.fetch_timeout_secs,
    )?;
    validate_timeout("pipeline.deadline_secs", config.pipeline.deadline_secs)
}

/// Worst case time for one identification before the local tier runs.
///
/// Fetch, then every remote tier timing out, then the reference lookup.
pub fn remote_budget_secs(config: &Config) -> u64 {
    let reference = if config.reference.enabled {
        config.reference.timeout_secs
    } else {
        0
    };
    config
        .pipeline
        .fetch_timeout_secs
        .saturating_add(config.classifiers.timeout_secs.saturating_mul(3))
        .saturating_add(reference)
}

/// The submission deadline must leave room for every tier to time out.
fn validate_deadline_budget(config: &Config) -> Result<()> {
    let budget = remote_budget_secs(config);
    if budget >= config.pipeline.deadline_secs {
        return Err(Error::ConfigValidation {
            message: format!(
                "pipeline.deadline_secs ({}) must exceed fetch_timeout_secs + 3 x classifiers.timeout_secs + reference.timeout_secs ({budget})",
                config.pipeline.deadline_secs
            ),
        });
    }
    Ok(())
}

fn validate_timeout(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(Error::ConfigValidation {
            message: format!("{field} must be at least 1 second"),
        });
    }
    Ok(())
}

fn validate_endpoint(field: &str, url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::ConfigValidation {
            message: format!("{field} must be an http(s) URL, got '{url}'"),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_classifier_timeout() {
        let mut config = Config::default();
        config.classifiers.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_model_id() {
        let mut config = Config::default();
        config.classifiers.backup_2.model = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }

    #[test]
    fn test_validate_non_http_endpoint() {
        let mut config = Config::default();
        config.classifiers.endpoint = "ftp://models.example".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_default_deadline_covers_all_tiers() {
        let config = Config::default();
        assert_eq!(remote_budget_secs(&config), 33);
        assert!(remote_budget_secs(&config) < config.pipeline.deadline_secs);
    }

    #[test]
    fn test_classifier_timeout_longer_than_deadline_rejected() {
        let mut config = Config::default();
        config.classifiers.timeout_secs = 30;
        config.pipeline.deadline_secs = 25;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("pipeline.deadline_secs (25)"));
    }

    #[test]
    fn test_budget_equal_to_deadline_rejected() {
        let mut config = Config::default();
        config.pipeline.deadline_secs = remote_budget_secs(&config);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_disabled_reference_frees_budget() {
        let mut config = Config::default();
        config.pipeline.deadline_secs = 30;
        assert!(validate_config(&config).is_err());
        config.reference.enabled = false;
        assert_eq!(remote_budget_secs(&config), 28);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_disabled_reference_skips_endpoint_check() {
        let mut config = Config::default();
        config.reference.enabled = false;
        config.reference.endpoint = String::new();
        assert!(validate_config(&config).is_ok());
    }
}
