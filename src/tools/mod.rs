pub mod open_weather;

pub use open_weather::{
    AlertsReport, CurrentWeather, GetCurrentWeatherInput, GetWeatherByCoordinatesInput,
    GetWeatherForecastInput, OpenWeatherTools, Units, WeatherAlert,
};
