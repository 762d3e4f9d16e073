use serde::Deserialize;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for ESG Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub harvester: HarvesterConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Worker pool and request behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvesterConfig {
    /// URL prefix that the identifier is appended to (must end with '=')
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Number of concurrent workers inside each outer unit
    #[serde(rename = "threads-per-worker")]
    pub threads_per_worker: u32,

    /// Number of outer units; defaults to the number of available CPUs
    #[serde(default)]
    pub workers: Option<u32>,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl HarvesterConfig {
    /// Resolves the outer fan-out width
    pub fn worker_count(&self) -> usize {
        self.workers
            .map(|w| w as usize)
            .unwrap_or_else(num_cpus::get)
    }
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header: Name/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Static input data locations
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// JSON array of objects carrying an `id` field
    #[serde(rename = "tickers-path")]
    pub tickers_path: String,

    /// JSON array of `{country_name, country_iso3}` objects
    #[serde(rename = "countries-path")]
    pub countries_path: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON file the final mapping is written to
    #[serde(rename = "results-path")]
    pub results_path: String,
}
