use crate::server::WeatherServer;
use serde_json::json;

use super::dto::{McpRequest, McpResponse, ToolCall};

pub async fn handle_request(server: &WeatherServer, request: McpRequest) -> McpResponse {
    match request.method.as_str() {
        "tools/list" => McpResponse::success(
            request.id,
            json!({
                "tools": server.get_tools()
            }),
        ),
        "tools/call" => {
            let params = match request.params {
                Some(params) => params,
                None => return McpResponse::failure(request.id, -32602, "Missing parameters"),
            };
            let tool_call = match serde_json::from_value::<ToolCall>(params) {
                Ok(call) => call,
                Err(_) => {
                    return McpResponse::failure(
                        request.id,
                        -32602,
                        "Invalid tool call parameters",
                    )
                }
            };
            match server.handle_tool_call(tool_call).await {
                Ok(result) => McpResponse::success(
                    request.id,
                    json!({
                        "content": [
                            { "type": "text", "text": result.content }
                        ],
                        "isError": result.is_error
                    }),
                ),
                Err(e) => McpResponse::failure(request.id, e.rpc_code(), e.to_string()),
            }
        }
        "initialize" => McpResponse::success(
            request.id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "weather-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),
        "ping" => McpResponse::success(request.id, json!({ "ok": true })),
        _ => McpResponse::failure(
            request.id,
            -32601,
            format!("Method not found: {}", request.method),
        ),
    }
}
