use crate::error::WeatherError;
use crate::mcp::dto::{McpRequest, McpResponse};
use crate::mcp::handler;
use crate::sse::{self, SseSessions};
use crate::tools::open_weather::{format, AlertsReport, CurrentWeather, Units};
use crate::WeatherServer;
use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) server: Arc<WeatherServer>,
    pub(crate) sessions: Arc<SseSessions>,
}

#[derive(Debug, Deserialize)]
struct WeatherRequest {
    location: String,
    #[serde(default)]
    units: Units,
}

/// REST-side rendering of WeatherError. Upstream failures pass the
/// provider's status through; everything else maps to a gateway-style
/// status with a user-visible message.
struct ApiError(WeatherError);

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WeatherError::Upstream { status, body } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                body.clone(),
            ),
            WeatherError::Transport(e) if e.is_timeout() => (
                StatusCode::GATEWAY_TIMEOUT,
                "upstream request timed out".to_string(),
            ),
            WeatherError::Transport(_) => (
                StatusCode::BAD_GATEWAY,
                "upstream request failed".to_string(),
            ),
            WeatherError::Format { .. } => (StatusCode::BAD_GATEWAY, self.0.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "weather-mcp",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /get_current_weather",
            "POST /get_weather_alerts",
            "GET /weather/{location}",
            "GET /health",
            "POST /mcp",
            "GET /mcp/info",
            "GET /mcp/test",
            "GET /sse",
            "POST /messages/"
        ]
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_current_weather(
    State(state): State<AppState>,
    Json(req): Json<WeatherRequest>,
) -> std::result::Result<Json<CurrentWeather>, ApiError> {
    let raw = state
        .server
        .weather()
        .current_by_city(&req.location, req.units)
        .await?;
    Ok(Json(format::current_structured(&raw, req.units)?))
}

async fn get_weather_alerts(
    State(state): State<AppState>,
    Json(req): Json<WeatherRequest>,
) -> std::result::Result<Json<AlertsReport>, ApiError> {
    // Resolve coordinates first, then ask the one-call endpoint for the
    // alerts section only.
    let raw = state
        .server
        .weather()
        .current_by_city(&req.location, Units::Metric)
        .await?;
    let (lat, lon) = format::coordinates(&raw)?;
    let alerts_raw = state.server.weather().alerts(lat, lon).await?;
    Ok(Json(format::alerts_report(&req.location, &alerts_raw)?))
}

async fn weather_by_path(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> std::result::Result<Json<CurrentWeather>, ApiError> {
    let location = match urlencoding::decode(&location) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => location,
    };
    let raw = state
        .server
        .weather()
        .current_by_city(&location, Units::Metric)
        .await?;
    Ok(Json(format::current_structured(&raw, Units::Metric)?))
}

async fn mcp_rpc(
    State(state): State<AppState>,
    Json(req): Json<McpRequest>,
) -> Json<McpResponse> {
    Json(handler::handle_request(&state.server, req).await)
}

async fn mcp_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "weather-mcp",
        "version": env!("CARGO_PKG_VERSION"),
        "protocolVersion": "2024-11-05",
        "transport": state.server.config().server.transport,
        "tools": state.server.get_tools()
    }))
}

async fn mcp_self_test(State(state): State<AppState>) -> Json<Value> {
    let request = McpRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!("self-test")),
        method: "tools/list".to_string(),
        params: None,
    };
    let response = handler::handle_request(&state.server, request).await;
    let count = response
        .result
        .as_ref()
        .and_then(|r| r.get("tools"))
        .and_then(Value::as_array)
        .map(|tools| tools.len())
        .unwrap_or(0);
    match response.error {
        None => Json(json!({ "status": "ok", "tools": count })),
        Some(err) => Json(json!({ "status": "error", "message": err.message })),
    }
}

pub async fn run_http_server(server: WeatherServer, port: u16) -> Result<()> {
    let state = AppState {
        server: Arc::new(server),
        sessions: Arc::new(SseSessions::new()),
    };

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/weather/:location", get(weather_by_path))
        .route("/get_current_weather", post(get_current_weather))
        .route("/get_weather_alerts", post(get_weather_alerts))
        .route("/mcp", post(mcp_rpc))
        .route("/mcp/info", get(mcp_info))
        .route("/mcp/test", get(mcp_self_test))
        .route("/sse", get(sse::sse_handler))
        .route("/messages", post(sse::messages_handler))
        .route("/messages/", post(sse::messages_handler))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
