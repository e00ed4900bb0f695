pub mod dto;
pub mod format;
pub(crate) mod helpers;
pub mod implementation;

pub use dto::{
    AlertsReport, CurrentWeather, GetCurrentWeatherInput, GetWeatherByCoordinatesInput,
    GetWeatherForecastInput, Units, WeatherAlert,
};
pub use implementation::OpenWeatherTools;
