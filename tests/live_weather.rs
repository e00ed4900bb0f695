// Integration tests that hit the real OpenWeather API. Marked ignored by
// default; run with OPENWEATHER_API_KEY set and --ignored.
use serde_json::json;
use weather_mcp::mcp::dto::ToolCall;
use weather_mcp::{WeatherConfig, WeatherServer};

fn live_server() -> WeatherServer {
    let config = WeatherConfig::from_env().expect("OPENWEATHER_API_KEY must be set");
    WeatherServer::new(config).unwrap()
}

#[tokio::test]
#[ignore]
async fn get_current_weather_live() {
    let server = live_server();
    let call = ToolCall {
        name: "get_current_weather".into(),
        arguments: json!({ "location": "London" }),
    };
    let res = server.handle_tool_call(call).await.unwrap();
    assert!(res.content.contains("London"));
    assert!(res.content.contains("Temperature:"));
}

#[tokio::test]
#[ignore]
async fn get_weather_forecast_live() {
    let server = live_server();
    let call = ToolCall {
        name: "get_weather_forecast".into(),
        arguments: json!({ "location": "Paris", "units": "metric" }),
    };
    let res = server.handle_tool_call(call).await.unwrap();
    assert!(res.content.contains("forecast for Paris"));
}
