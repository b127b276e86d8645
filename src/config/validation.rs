use crate::config::types::{
    ApplicationConfig, ConfidenceConfig, Config, HttpConfig, RediscoveryConfig,
    VendorFallbackConfig, VocabularyConfig,
};
use crate::ConfigError;
use regex::Regex;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_rediscovery_config(&config.rediscovery)?;
    validate_confidence_config(&config.confidence)?;
    validate_application_config(&config.application, &config.confidence)?;
    validate_vocabulary(&config.vocabulary)?;
    validate_vendor_fallback(&config.vendor_fallback)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be between 1 and timeout_secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.max_redirects < 1 || config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be between 1 and 20, got {}",
            config.max_redirects
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates gating configuration
fn validate_rediscovery_config(config: &RediscoveryConfig) -> Result<(), ConfigError> {
    if config.validate_top_n < 1 {
        return Err(ConfigError::Validation(format!(
            "validate_top_n must be >= 1, got {}",
            config.validate_top_n
        )));
    }

    if config.body_scan_limit < 1024 {
        return Err(ConfigError::Validation(format!(
            "body_scan_limit must be >= 1024 bytes, got {}",
            config.body_scan_limit
        )));
    }

    if let Some(code) = config
        .do_not_touch_statuses
        .iter()
        .find(|code| config.rediscover_statuses.contains(code))
    {
        return Err(ConfigError::Validation(format!(
            "status {} cannot be both a rediscover status and a do-not-touch status",
            code
        )));
    }

    Ok(())
}

/// Validates confidence bounds
fn validate_confidence_config(config: &ConfidenceConfig) -> Result<(), ConfigError> {
    if config.max > 95 {
        return Err(ConfigError::Validation(format!(
            "confidence max must be <= 95, got {}",
            config.max
        )));
    }

    for (name, value) in [
        ("base", config.base),
        ("vendor_floor", config.vendor_floor),
        ("pdf_cap", config.pdf_cap),
        ("ephemeral", config.ephemeral),
    ] {
        if value > config.max {
            return Err(ConfigError::Validation(format!(
                "confidence {} ({}) cannot exceed confidence max ({})",
                name, value, config.max
            )));
        }
    }

    Ok(())
}

/// Validates application finder thresholds
fn validate_application_config(
    config: &ApplicationConfig,
    confidence: &ConfidenceConfig,
) -> Result<(), ConfigError> {
    if config.confidence > confidence.max {
        return Err(ConfigError::Validation(format!(
            "application confidence ({}) cannot exceed confidence max ({})",
            config.confidence, confidence.max
        )));
    }

    if config.min_score <= 0 {
        return Err(ConfigError::Validation(format!(
            "application min_score must be positive, got {}",
            config.min_score
        )));
    }

    Ok(())
}

/// Validates keyword tables, domain lists and patterns
fn validate_vocabulary(vocabulary: &VocabularyConfig) -> Result<(), ConfigError> {
    if vocabulary.employment_keywords.is_empty() {
        return Err(ConfigError::Validation(
            "employment_keywords cannot be empty".to_string(),
        ));
    }

    if vocabulary.employment_keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "employment_keywords cannot contain empty entries".to_string(),
        ));
    }

    for domain in vocabulary
        .vendor_domains
        .iter()
        .chain(vocabulary.social_domains.iter())
    {
        validate_domain_string(domain)?;
    }

    for pattern in &vocabulary.soft404_patterns {
        compile_pattern(pattern)?;
    }
    compile_pattern(&vocabulary.page_id_pattern)?;

    if vocabulary.splash_params.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "splash_params cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates vendor slug templates
fn validate_vendor_fallback(config: &VendorFallbackConfig) -> Result<(), ConfigError> {
    for template in &config.url_templates {
        if !template.contains("{slug}") {
            return Err(ConfigError::InvalidPattern(format!(
                "Vendor URL template '{}' must contain a {{slug}} placeholder",
                template
            )));
        }

        let sample = template.replace("{slug}", "sample");
        url::Url::parse(&sample).map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "Vendor URL template '{}' is not a valid URL: {}",
                template, e
            ))
        })?;
    }

    if !config
        .state_suffix
        .chars()
        .all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "state_suffix must be alphanumeric, got '{}'",
            config.state_suffix
        )));
    }

    Ok(())
}

/// Compiles a case-insensitive pattern, reporting failures as config errors
fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    regex::RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))
}

/// Validates a bare domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
