use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the JSON bundle holding the catalog and similarity matrix
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,

    /// Optional path to the extended movie metadata CSV
    #[serde(default)]
    pub catalog_csv_path: Option<String>,

    /// TMDB API key. Movie details are disabled when unset.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Timeout for each metadata request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay before each outbound metadata request, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Redis connection URL. Metadata responses are not cached when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Number of recommendations when the request does not say
    #[serde(default = "default_count")]
    pub default_count: i64,

    /// Upper bound on recommendations per request
    #[serde(default = "default_max_count")]
    pub max_count: i64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_artifact_path() -> String {
    "data/movie_data.json".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_count() -> i64 {
    5
}

fn default_max_count() -> i64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.max_count < 1 {
            anyhow::bail!("MAX_COUNT must be at least 1, got {}", config.max_count);
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Redis URL for the details cache, `None` unless a TMDB key enables the provider
    pub fn cache_url(&self) -> Option<&str> {
        self.tmdb_api_key.as_ref().and(self.redis_url.as_deref())
    }
}
