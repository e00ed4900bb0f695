use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_mcp::http;
use weather_mcp::mcp::{
    dto::{McpRequest, McpResponse},
    handler,
};
use weather_mcp::{WeatherConfig, WeatherServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env for local dev (if present)
    if dotenvy::dotenv().is_ok() {
        tracing::info!("Loaded .env");
    }

    tracing::info!("Starting Weather MCP Server");

    // A missing OPENWEATHER_API_KEY fails here, before any request is served
    let config = WeatherConfig::from_env()?;
    tracing::info!(
        "Configuration loaded: transport={}, port={}",
        config.server.transport,
        config.server.port
    );

    let server = WeatherServer::new(config.clone())?;

    let tools = server.get_tools();
    tracing::info!("Available tools: {}", tools.len());
    for tool in &tools {
        tracing::info!("  - {}: {}", tool.name, tool.description);
    }

    match config.server.transport.to_lowercase().as_str() {
        "stdio" => {
            tracing::info!("Weather MCP Server running with stdio transport");

            // Newline-delimited JSON-RPC on stdin/stdout
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let mut reader = BufReader::new(stdin);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break, // EOF
                    Ok(_) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }

                        tracing::debug!("Received: {}", line);

                        match serde_json::from_str::<McpRequest>(line) {
                            Ok(request) => {
                                let response = handler::handle_request(&server, request).await;
                                let response_json = serde_json::to_string(&response)?;

                                tracing::debug!("Sending: {}", response_json);

                                stdout.write_all(response_json.as_bytes()).await?;
                                stdout.write_all(b"\n").await?;
                                stdout.flush().await?;
                            }
                            Err(e) => {
                                tracing::error!("Failed to parse request: {}", e);
                                let error_response =
                                    McpResponse::failure(None, -32700, "Parse error");

                                let error_json = serde_json::to_string(&error_response)?;
                                stdout.write_all(error_json.as_bytes()).await?;
                                stdout.write_all(b"\n").await?;
                                stdout.flush().await?;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("Error reading from stdin: {}", e);
                        break;
                    }
                }
            }

            tracing::info!("Weather MCP Server shutting down");
            Ok(())
        }
        _ => {
            tracing::info!(
                "Weather MCP Server running with HTTP transport on port {}",
                config.server.port
            );
            http::run_http_server(server, config.server.port).await?;
            Ok(())
        }
    }
}
