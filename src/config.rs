use std::env;

/// Process configuration, read once at startup. `DATABASE_URL` is required;
/// the listen address defaults to 0.0.0.0:8000 so the API is reachable from
/// outside a container without extra wiring.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);
        Ok(Self {
            database_url,
            host,
            port,
        })
    }
}
