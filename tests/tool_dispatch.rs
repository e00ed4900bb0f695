use serde_json::json;
use weather_mcp::mcp::{dto::McpRequest, handler};
use weather_mcp::{WeatherConfig, WeatherServer};

fn test_server() -> WeatherServer {
    let mut config = WeatherConfig::default();
    config.provider.api_key = "test-key".to_string();
    // Unroutable upstream so handler failures are transport errors, not
    // live network calls
    config.provider.base_url = "http://127.0.0.1:9".to_string();
    WeatherServer::new(config).unwrap()
}

fn request(method: &str, params: Option<serde_json::Value>) -> McpRequest {
    McpRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(1)),
        method: method.to_string(),
        params,
    }
}

#[tokio::test]
async fn unknown_method_returns_32601() {
    let server = test_server();
    let resp = handler::handle_request(&server, request("tools/destroy", None)).await;
    assert!(resp.result.is_none());
    let err = resp.error.expect("expected error response");
    assert_eq!(err.code, -32601);
}

#[tokio::test]
async fn unknown_tool_returns_32601() {
    let server = test_server();
    let params = json!({ "name": "get_stock_price", "arguments": {} });
    let resp = handler::handle_request(&server, request("tools/call", Some(params))).await;
    assert!(resp.result.is_none());
    let err = resp.error.expect("expected error response");
    assert_eq!(err.code, -32601);
}

#[tokio::test]
async fn missing_params_returns_32602() {
    let server = test_server();
    let resp = handler::handle_request(&server, request("tools/call", None)).await;
    assert!(resp.result.is_none());
    let err = resp.error.expect("expected error response");
    assert_eq!(err.code, -32602);
}

#[tokio::test]
async fn params_without_arguments_return_32602() {
    let server = test_server();
    let params = json!({ "name": "get_current_weather" });
    let resp = handler::handle_request(&server, request("tools/call", Some(params))).await;
    assert!(resp.result.is_none());
    let err = resp.error.expect("expected error response");
    assert_eq!(err.code, -32602);
}

#[tokio::test]
async fn schema_invalid_arguments_return_32602() {
    let server = test_server();
    // location must be a string per the declared inputSchema
    let params = json!({ "name": "get_current_weather", "arguments": { "location": 42 } });
    let resp = handler::handle_request(&server, request("tools/call", Some(params))).await;
    assert!(resp.result.is_none());
    let err = resp.error.expect("expected error response");
    assert_eq!(err.code, -32602);
}

#[tokio::test]
async fn handler_failure_returns_32603_without_result() {
    let server = test_server();
    let params = json!({ "name": "get_current_weather", "arguments": { "location": "London" } });
    let resp = handler::handle_request(&server, request("tools/call", Some(params))).await;
    assert!(resp.result.is_none());
    let err = resp.error.expect("expected error response");
    assert_eq!(err.code, -32603);
}

#[tokio::test]
async fn tools_list_matches_registry() {
    let server = test_server();
    let resp = handler::handle_request(&server, request("tools/list", None)).await;
    assert!(resp.error.is_none());
    let result = resp.result.expect("expected result");
    let listed = result["tools"].as_array().unwrap();
    assert_eq!(listed.len(), server.get_tools().len());

    let mut listed_names: Vec<&str> = listed
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    let tools = server.get_tools();
    let mut registry_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    listed_names.sort_unstable();
    registry_names.sort_unstable();
    assert_eq!(listed_names, registry_names);
}

#[tokio::test]
async fn initialize_and_ping_succeed() {
    let server = test_server();

    let resp = handler::handle_request(&server, request("initialize", None)).await;
    assert!(resp.error.is_none());
    let result = resp.result.expect("expected result");
    assert_eq!(result["serverInfo"]["name"], "weather-mcp");

    let resp = handler::handle_request(&server, request("ping", None)).await;
    assert!(resp.error.is_none());
    assert_eq!(resp.result.expect("expected result")["ok"], true);
}
