use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0 and uploads may be non-empty
/// - Tool timeouts, bitrate and concurrency are positive
/// - A default effect is named
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let checks = [
        (config.server.port == 0, "server.port cannot be 0"),
        (
            config.server.max_upload_bytes == 0,
            "server.max_upload_bytes must be greater than 0",
        ),
        (
            config.transcoder.timeout_secs == 0,
            "transcoder.timeout_secs must be greater than 0",
        ),
        (
            config.effect.timeout_secs == 0,
            "effect.timeout_secs must be greater than 0",
        ),
        (
            config.effect.default_effect.trim().is_empty(),
            "effect.default_effect cannot be empty",
        ),
        (
            config.pipeline.max_concurrent_runs == 0,
            "pipeline.max_concurrent_runs must be greater than 0",
        ),
        (
            config.pipeline.output_bitrate_kbps == 0,
            "pipeline.output_bitrate_kbps must be greater than 0",
        ),
    ];

    for (failed, message) in checks {
        if failed {
            return Err(ConfigError::ValidationError(message.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.effect.timeout_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: effect.timeout_secs must be greater than 0"
        );
    }

    #[test]
    fn test_validate_blank_default_effect_fails() {
        let mut config = Config::default();
        config.effect.default_effect = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_concurrency_fails() {
        let mut config = Config::default();
        config.pipeline.max_concurrent_runs = 0;
        assert!(validate_config(&config).is_err());
    }
}
