// Minimal example: call the weather tools directly via WeatherServer
use anyhow::Result;
use serde_json::json;
use weather_mcp::mcp::dto::ToolCall;
use weather_mcp::{WeatherConfig, WeatherServer};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = WeatherConfig::from_env()?;
    let server = WeatherServer::new(config)?;

    println!("Available tools:");
    for t in server.get_tools() {
        println!(" - {}: {}", t.name, t.description);
    }

    let current = ToolCall {
        name: "get_current_weather".into(),
        arguments: json!({ "location": "New York", "units": "metric" }),
    };
    println!(
        "\nget_current_weather ->\n{}",
        server.handle_tool_call(current).await?.content
    );

    let forecast = ToolCall {
        name: "get_weather_forecast".into(),
        arguments: json!({ "location": "Paris" }),
    };
    println!(
        "get_weather_forecast ->\n{}",
        server.handle_tool_call(forecast).await?.content
    );

    let coords = ToolCall {
        name: "get_weather_by_coordinates".into(),
        arguments: json!({ "latitude": 40.7128, "longitude": -74.0060 }),
    };
    println!(
        "get_weather_by_coordinates ->\n{}",
        server.handle_tool_call(coords).await?.content
    );

    Ok(())
}
