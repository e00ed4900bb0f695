use super::dto::{AlertsReport, CurrentWeather, Units, WeatherAlert};
use crate::error::{Result, WeatherError};
use chrono::DateTime;
use serde_json::Value;

// Forecast rendering caps: first 15 three-hourly entries, at most 3 shown
// per calendar date.
const MAX_FORECAST_ENTRIES: usize = 15;
const MAX_ENTRIES_PER_DAY: usize = 3;

fn lookup<'a>(raw: &'a Value, field: &'static str) -> Result<&'a Value> {
    let pointer = format!("/{}", field.replace('.', "/"));
    raw.pointer(&pointer)
        .filter(|v| !v.is_null())
        .ok_or(WeatherError::Format { field })
}

fn require_str<'a>(raw: &'a Value, field: &'static str) -> Result<&'a str> {
    lookup(raw, field)?
        .as_str()
        .ok_or(WeatherError::Format { field })
}

fn require_f64(raw: &Value, field: &'static str) -> Result<f64> {
    lookup(raw, field)?
        .as_f64()
        .ok_or(WeatherError::Format { field })
}

fn require_i64(raw: &Value, field: &'static str) -> Result<i64> {
    lookup(raw, field)?
        .as_i64()
        .ok_or(WeatherError::Format { field })
}

/// Structured mode: a current-weather payload mapped to the fixed-key shape
/// the REST endpoints return. Any missing field is a Format error naming
/// the dotted path.
pub fn current_structured(raw: &Value, units: Units) -> Result<CurrentWeather> {
    let city = require_str(raw, "name")?;
    let country = require_str(raw, "sys.country")?;
    let temp = require_f64(raw, "main.temp")?;
    let feels_like = require_f64(raw, "main.feels_like")?;
    let humidity = require_f64(raw, "main.humidity")?;
    let wind_speed = require_f64(raw, "wind.speed")?;
    let conditions = require_str(raw, "weather.0.description")?;
    let timestamp = require_i64(raw, "dt")?;

    Ok(CurrentWeather {
        location: format!("{}, {}", city, country),
        temperature: format!("{}°{}", temp, units.temp_suffix()),
        feels_like: format!("{}°{}", feels_like, units.temp_suffix()),
        humidity: format!("{:.0}%", humidity),
        wind_speed: format!("{} {}", wind_speed, units.wind_unit()),
        conditions: conditions.to_string(),
        timestamp,
    })
}

/// Coordinates of a current-weather payload, used to chain into the
/// one-call alerts lookup.
pub fn coordinates(raw: &Value) -> Result<(f64, f64)> {
    Ok((require_f64(raw, "coord.lat")?, require_f64(raw, "coord.lon")?))
}

/// Text mode: a human-readable block for tool-protocol clients.
pub fn current_text(raw: &Value, units: Units) -> Result<String> {
    let city = require_str(raw, "name")?;
    let country = require_str(raw, "sys.country")?;
    let temp = require_f64(raw, "main.temp")?;
    let feels_like = require_f64(raw, "main.feels_like")?;
    let humidity = require_f64(raw, "main.humidity")?;
    let wind_speed = require_f64(raw, "wind.speed")?;
    let conditions = require_str(raw, "weather.0.description")?;
    let timestamp = require_i64(raw, "dt")?;
    let suffix = units.temp_suffix();

    let mut out = format!("Current weather in {}, {}:\n", city, country);
    out.push_str(&format!(
        "Temperature: {:.1}°{} (feels like {:.1}°{})\n",
        temp, suffix, feels_like, suffix
    ));
    out.push_str(&format!("Conditions: {}\n", title_case(conditions)));
    out.push_str(&format!("Humidity: {:.0}%\n", humidity));
    match raw.pointer("/wind/deg").and_then(Value::as_f64) {
        Some(deg) => out.push_str(&format!(
            "Wind: {} {} at {:.0}°\n",
            wind_speed,
            units.wind_unit(),
            deg
        )),
        None => out.push_str(&format!("Wind: {} {}\n", wind_speed, units.wind_unit())),
    }
    if let Some(observed) = DateTime::from_timestamp(timestamp, 0) {
        out.push_str(&format!("Observed: {} UTC\n", observed.format("%Y-%m-%d %H:%M")));
    }
    Ok(out)
}

/// Forecast text mode: the first 15 entries grouped by calendar date, at
/// most 3 entries rendered per date with the time truncated to HH:MM.
pub fn forecast_text(raw: &Value, units: Units) -> Result<String> {
    let city = require_str(raw, "city.name")?;
    let country = require_str(raw, "city.country")?;
    let list = lookup(raw, "list")?
        .as_array()
        .ok_or(WeatherError::Format { field: "list" })?;

    // Entries arrive chronological; first-seen order keeps the dates sorted.
    let mut buckets: Vec<(String, Vec<String>)> = Vec::new();
    for entry in list.iter().take(MAX_FORECAST_ENTRIES) {
        let (date, time) = entry_date_time(entry)?;
        let temp = require_f64(entry, "main.temp")?;
        let conditions = require_str(entry, "weather.0.description")?;
        let line = format!(
            "  {}: {:.1}°{}, {}",
            time,
            temp,
            units.temp_suffix(),
            title_case(conditions)
        );
        match buckets.iter_mut().find(|(d, _)| *d == date) {
            Some((_, lines)) => lines.push(line),
            None => buckets.push((date, vec![line])),
        }
    }

    let mut out = format!("5-day forecast for {}, {}:\n", city, country);
    for (date, lines) in &buckets {
        out.push('\n');
        out.push_str(date);
        out.push_str(":\n");
        for line in lines.iter().take(MAX_ENTRIES_PER_DAY) {
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}

fn entry_date_time(entry: &Value) -> Result<(String, String)> {
    if let Some(dt_txt) = entry.get("dt_txt").and_then(Value::as_str) {
        let date = dt_txt.split(' ').next().unwrap_or(dt_txt).to_string();
        let time = dt_txt.get(11..16).unwrap_or("00:00").to_string();
        return Ok((date, time));
    }
    let ts = require_i64(entry, "dt")?;
    let stamp = DateTime::from_timestamp(ts, 0).ok_or(WeatherError::Format { field: "dt" })?;
    Ok((
        stamp.format("%Y-%m-%d").to_string(),
        stamp.format("%H:%M").to_string(),
    ))
}

/// Projection of a one-call alerts payload. An empty or absent list is a
/// success with a "No active alerts" status.
pub fn alerts_report(location: &str, raw: &Value) -> Result<AlertsReport> {
    let alerts = raw
        .get("alerts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut formatted = Vec::with_capacity(alerts.len());
    for alert in alerts {
        formatted.push(WeatherAlert {
            event: require_str(alert, "event")?.to_string(),
            description: require_str(alert, "description")?.to_string(),
            start: require_i64(alert, "start")?,
            end: require_i64(alert, "end")?,
        });
    }

    let status = if formatted.is_empty() {
        "No active alerts".to_string()
    } else {
        format!("{} alerts found", formatted.len())
    };

    Ok(AlertsReport {
        location: location.to_string(),
        alerts: formatted,
        status,
    })
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_sample() -> Value {
        json!({
            "name": "London",
            "sys": { "country": "GB" },
            "main": { "temp": 18.5, "feels_like": 17.2, "humidity": 72 },
            "wind": { "speed": 3.6, "deg": 250 },
            "weather": [ { "description": "scattered clouds" } ],
            "dt": 1714564800,
            "coord": { "lat": 51.5074, "lon": -0.1278 }
        })
    }

    #[test]
    fn structured_maps_all_fields() {
        let result = current_structured(&current_sample(), Units::Metric).unwrap();
        assert_eq!(result.location, "London, GB");
        assert_eq!(result.temperature, "18.5°C");
        assert_eq!(result.feels_like, "17.2°C");
        assert_eq!(result.humidity, "72%");
        assert_eq!(result.wind_speed, "3.6 m/s");
        assert_eq!(result.conditions, "scattered clouds");
        assert_eq!(result.timestamp, 1714564800);
    }

    #[test]
    fn structured_missing_temp_is_format_error() {
        let mut raw = current_sample();
        raw["main"].as_object_mut().unwrap().remove("temp");
        let err = current_structured(&raw, Units::Metric).unwrap_err();
        match err {
            WeatherError::Format { field } => assert_eq!(field, "main.temp"),
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn imperial_units_change_suffixes() {
        let result = current_structured(&current_sample(), Units::Imperial).unwrap();
        assert_eq!(result.temperature, "18.5°F");
        assert_eq!(result.wind_speed, "3.6 mph");
    }

    #[test]
    fn text_mode_has_titled_conditions_and_unit_letter() {
        let text = current_text(&current_sample(), Units::Metric).unwrap();
        assert!(text.contains("Current weather in London, GB"));
        assert!(text.contains("Temperature: 18.5°C"));
        assert!(text.contains("Conditions: Scattered Clouds"));
        assert!(text.contains("Wind: 3.6 m/s at 250°"));
    }

    #[test]
    fn kelvin_units_use_k_suffix() {
        let text = current_text(&current_sample(), Units::Kelvin).unwrap();
        assert!(text.contains("°K"));
    }

    #[test]
    fn coordinates_come_from_coord_block() {
        let (lat, lon) = coordinates(&current_sample()).unwrap();
        assert!((lat - 51.5074).abs() < 1e-9);
        assert!((lon - (-0.1278)).abs() < 1e-9);
    }

    fn forecast_sample(entries: usize) -> Value {
        // Three-hourly entries starting 2024-05-01 00:00.
        let list: Vec<Value> = (0..entries)
            .map(|i| {
                let day = 1 + (i * 3) / 24;
                let hour = (i * 3) % 24;
                json!({
                    "dt": 1714521600 + (i as i64) * 10800,
                    "dt_txt": format!("2024-05-{:02} {:02}:00:00", day, hour),
                    "main": { "temp": 10.0 + i as f64 },
                    "weather": [ { "description": "light rain" } ]
                })
            })
            .collect();
        json!({
            "city": { "name": "Paris", "country": "FR" },
            "list": list
        })
    }

    #[test]
    fn forecast_groups_by_date_with_caps() {
        let text = forecast_text(&forecast_sample(16), Units::Metric).unwrap();
        let dates: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("2024-05-"))
            .collect();
        assert!(dates.len() <= 5);
        // 15 entries at 3h spacing never span more than 3 dates.
        assert_eq!(dates.len(), 2);
        let entries_per_day: Vec<usize> = dates
            .iter()
            .map(|d| {
                let day_block = text.split(d).nth(1).unwrap();
                day_block
                    .lines()
                    .skip(1)
                    .take_while(|l| l.starts_with("  "))
                    .count()
            })
            .collect();
        assert!(entries_per_day.iter().all(|&n| n <= 3));
        assert!(text.contains("00:00: 10.0°C, Light Rain"));
    }

    #[test]
    fn forecast_entry_without_dt_txt_falls_back_to_dt() {
        let mut raw = forecast_sample(2);
        raw["list"][0].as_object_mut().unwrap().remove("dt_txt");
        let text = forecast_text(&raw, Units::Metric).unwrap();
        assert!(text.contains("2024-05-01"));
    }

    #[test]
    fn empty_alerts_is_not_an_error() {
        let report = alerts_report("London", &json!({ "alerts": [] })).unwrap();
        assert_eq!(report.status, "No active alerts");
        assert!(report.alerts.is_empty());

        let report = alerts_report("London", &json!({})).unwrap();
        assert_eq!(report.status, "No active alerts");
    }

    #[test]
    fn populated_alerts_are_projected() {
        let raw = json!({
            "alerts": [
                {
                    "sender_name": "Met Office",
                    "event": "Wind Warning",
                    "start": 1714500000,
                    "end": 1714550000,
                    "description": "Strong gusts expected",
                    "tags": ["Wind"]
                }
            ]
        });
        let report = alerts_report("London", &raw).unwrap();
        assert_eq!(report.status, "1 alerts found");
        assert_eq!(report.alerts[0].event, "Wind Warning");
        assert_eq!(report.alerts[0].start, 1714500000);
    }

    #[test]
    fn title_case_handles_multiword() {
        assert_eq!(title_case("scattered clouds"), "Scattered Clouds");
        assert_eq!(title_case("rain"), "Rain");
        assert_eq!(title_case(""), "");
    }
}
