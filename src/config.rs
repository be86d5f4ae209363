use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the catalog server listens on
    pub port: u16,
    /// Path to the SQLite database, with or without the `sqlite:` prefix
    pub database_url: String,
    /// Blanket deadline applied to every request
    pub request_timeout: Duration,
    /// Origins allowed through CORS
    pub allowed_origins: Vec<String>,
    /// API key for the criteria-extraction service; unset leaves the
    /// extraction endpoint answering with an upstream error
    pub extractor_api_key: Option<String>,
    /// generateContent endpoint of the extraction model
    pub extractor_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env_parse("PORT", 3000)?,
            database_url: env_str("DATABASE_URL", "sqlite:./data/devshowcase.db"),
            request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 30)?),
            allowed_origins: env_csv(
                "ALLOWED_ORIGINS",
                &["http://localhost:5173", "http://127.0.0.1:5173"],
            ),
            extractor_api_key: std::env::var("EXTRACTOR_API_KEY").ok(),
            extractor_url: env_str(
                "EXTRACTOR_URL",
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent",
            ),
        })
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

fn env_csv(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| (*s).to_string()).collect(),
    }
}
