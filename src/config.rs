use crate::error::{Result, WeatherError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub log_level: String,
    pub transport: String, // "http", "stdio"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3050,
                log_level: "info".to_string(),
                transport: "http".to_string(),
            },
            provider: ProviderConfig {
                // api_key stays empty in the baseline; from_env refuses to
                // start without one, tests inject their own
                api_key: String::new(),
                base_url: "https://api.openweathermap.org/data/2.5".to_string(),
                timeout_secs: 10,
            },
        }
    }
}

impl WeatherConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.provider.api_key = std::env::var("OPENWEATHER_API_KEY").map_err(|_| {
            WeatherError::config_error(
                "Missing OpenWeather API key. Set OPENWEATHER_API_KEY in the environment or .env.",
            )
        })?;

        if let Ok(base_url) = std::env::var("OPENWEATHER_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.provider.base_url = base_url;
            }
        }

        if let Ok(port) = std::env::var("WEATHER_MCP_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| WeatherError::config_error("Invalid WEATHER_MCP_PORT"))?;
        }

        if let Ok(log_level) = std::env::var("WEATHER_MCP_LOG_LEVEL") {
            config.server.log_level = log_level;
        }

        if let Ok(transport) = std::env::var("WEATHER_MCP_TRANSPORT") {
            config.server.transport = transport;
        }

        if let Ok(timeout) = std::env::var("WEATHER_MCP_UPSTREAM_TIMEOUT_SECS") {
            config.provider.timeout_secs = timeout
                .parse()
                .map_err(|_| WeatherError::config_error("Invalid WEATHER_MCP_UPSTREAM_TIMEOUT_SECS"))?;
        }

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WeatherError::config_error(format!("Failed to read config file: {}", e)))?;

        let config: WeatherConfig = toml::from_str(&content)
            .map_err(|e| WeatherError::config_error(format!("Failed to parse config file: {}", e)))?;

        if config.provider.api_key.is_empty() {
            return Err(WeatherError::config_error(
                "Config file is missing provider.api_key",
            ));
        }

        Ok(config)
    }
}
