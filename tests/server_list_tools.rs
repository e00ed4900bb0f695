use weather_mcp::{WeatherConfig, WeatherServer};

#[test]
fn list_tools_has_three_weather_tools() {
    let server = WeatherServer::new(WeatherConfig::default()).unwrap();
    let tools = server.get_tools();
    assert_eq!(tools.len(), 3);
    let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"get_current_weather"));
    assert!(names.contains(&"get_weather_forecast"));
    assert!(names.contains(&"get_weather_by_coordinates"));
}

#[test]
fn list_tools_is_stable_across_calls() {
    let server = WeatherServer::new(WeatherConfig::default()).unwrap();
    let first = serde_json::to_value(server.get_tools()).unwrap();
    let second = serde_json::to_value(server.get_tools()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn descriptors_expose_input_schema_only() {
    let server = WeatherServer::new(WeatherConfig::default()).unwrap();
    let value = serde_json::to_value(server.get_tools()).unwrap();
    for tool in value.as_array().unwrap() {
        assert!(tool.get("name").is_some());
        assert!(tool.get("description").is_some());
        assert!(tool.get("inputSchema").is_some());
        assert!(tool.get("handler").is_none());
    }
}
