use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the remote catalog API
    pub base_url: String,
    /// Pre-issued bearer token for the API, if the deployment requires one
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// How long a fetched dataset is trusted before a re-fetch (seconds)
    #[serde(default = "AnalyticsConfig::default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Background refresh cadence (seconds)
    #[serde(default = "AnalyticsConfig::default_refresh_secs")]
    pub refresh_secs: u64,
}

impl AnalyticsConfig {
    const fn default_cache_ttl_secs() -> u64 {
        60
    }

    const fn default_refresh_secs() -> u64 {
        60
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: Self::default_cache_ttl_secs(),
            refresh_secs: Self::default_refresh_secs(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("CATALOG_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());

        let api_token = std::env::var("CATALOG_API_TOKEN").ok().filter(|t| !t.is_empty());

        let cache_ttl_secs = env_u64("ANALYTICS_CACHE_TTL_SECS")
            .unwrap_or_else(AnalyticsConfig::default_cache_ttl_secs);
        let refresh_secs =
            env_u64("ANALYTICS_REFRESH_SECS").unwrap_or_else(AnalyticsConfig::default_refresh_secs);

        Ok(Config {
            catalog: CatalogConfig {
                base_url,
                api_token,
            },
            analytics: AnalyticsConfig {
                cache_ttl_secs,
                refresh_secs,
            },
        })
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<u64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring non-numeric {name}='{raw}', using default");
            None
        }
    }
}
