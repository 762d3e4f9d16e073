use crate::config::types::{Config, HarvesterConfig, InputConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on inner concurrency per outer unit
const MAX_THREADS_PER_WORKER: u32 = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvester_config(&config.harvester)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates pool widths, timeout and base URL
fn validate_harvester_config(config: &HarvesterConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    // Identifiers are recovered from the text after the last '='
    if !config.base_url.ends_with('=') {
        return Err(ConfigError::Validation(format!(
            "base_url must end with '=', got '{}'",
            config.base_url
        )));
    }

    if config.threads_per_worker < 1 || config.threads_per_worker > MAX_THREADS_PER_WORKER {
        return Err(ConfigError::Validation(format!(
            "threads_per_worker must be between 1 and {}, got {}",
            MAX_THREADS_PER_WORKER, config.threads_per_worker
        )));
    }

    if config.workers == Some(0) {
        return Err(ConfigError::Validation(
            "workers must be >= 1 when set".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the identity sent in the User-Agent header
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    let name = &config.crawler_name;
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "crawler_name must be non-empty alphanumeric/hyphen text, got '{}'",
            name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)
}

/// Validates input data locations
fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.tickers_path.is_empty() {
        return Err(ConfigError::Validation(
            "tickers_path cannot be empty".to_string(),
        ));
    }

    if config.countries_path.is_empty() {
        return Err(ConfigError::Validation(
            "countries_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks `local@domain.tld` shape; deliverability is not our concern
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.contains('@') && domain.contains('.')
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "Invalid contact_email: '{}'",
            email
        )))
    }
}
