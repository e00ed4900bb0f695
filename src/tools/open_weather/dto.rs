use serde::{Deserialize, Serialize};

/// Measurement system requested by the caller. The provider calls the
/// Kelvin scale "standard", so the wire value is mapped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Kelvin,
}

impl Units {
    pub fn api_value(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Kelvin => "standard",
        }
    }

    pub fn temp_suffix(&self) -> char {
        match self {
            Units::Metric => 'C',
            Units::Imperial => 'F',
            Units::Kelvin => 'K',
        }
    }

    pub fn wind_unit(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            _ => "m/s",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetCurrentWeatherInput {
    pub location: String,
    #[serde(default)]
    pub units: Units,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetWeatherForecastInput {
    pub location: String,
    #[serde(default)]
    pub units: Units,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetWeatherByCoordinatesInput {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub units: Units,
}

/// Structured-mode result for the REST endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub conditions: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: String,
    pub description: String,
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertsReport {
    pub location: String,
    pub alerts: Vec<WeatherAlert>,
    pub status: String,
}
