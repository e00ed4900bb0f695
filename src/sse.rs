use crate::http::AppState;
use crate::mcp::dto::{McpRequest, McpResponse};
use crate::mcp::handler;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Active SSE sessions. Each `GET /sse` connection gets a fresh session id;
/// `POST /messages/` routes its response onto the matching stream.
pub struct SseSessions {
    inner: Mutex<HashMap<String, mpsc::Sender<McpResponse>>>,
}

impl SseSessions {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    fn register(&self) -> (String, mpsc::Receiver<McpResponse>) {
        let session_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(16);
        self.inner.lock().unwrap().insert(session_id.clone(), tx);
        (session_id, rx)
    }

    fn unregister(&self, session_id: &str) {
        if self.inner.lock().unwrap().remove(session_id).is_some() {
            tracing::debug!("Unregistered SSE session {}", session_id);
        }
    }

    /// Push a response onto a session's stream. A session whose receiver is
    /// gone is dropped from the table on the spot.
    fn send(&self, session_id: &str, response: McpResponse) -> bool {
        let mut sessions = self.inner.lock().unwrap();
        if let Some(tx) = sessions.get(session_id) {
            if tx.try_send(response).is_ok() {
                return true;
            }
            sessions.remove(session_id);
        }
        false
    }
}

impl Default for SseSessions {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) async fn sse_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (session_id, mut rx) = state.sessions.register();
    let endpoint = format!("/messages/?session_id={}", session_id);
    tracing::info!("SSE session {} connected", session_id);

    let sessions = state.sessions.clone();
    let cleanup_id = session_id.clone();
    let stream = async_stream::stream! {
        // Endpoint event first, per the MCP SSE transport convention
        yield Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint));

        while let Some(response) = rx.recv().await {
            match serde_json::to_string(&response) {
                Ok(json) => yield Ok(Event::default().event("message").data(json)),
                Err(e) => tracing::error!("Failed to serialize response for SSE: {}", e),
            }
        }

        sessions.unregister(&cleanup_id);
        tracing::debug!("SSE session {} ended", cleanup_id);
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessagesParams {
    session_id: String,
}

pub(crate) async fn messages_handler(
    State(state): State<AppState>,
    Query(params): Query<MessagesParams>,
    Json(request): Json<McpRequest>,
) -> Response {
    let response = handler::handle_request(&state.server, request).await;

    if state.sessions.send(&params.session_id, response.clone()) {
        // Response travels on the SSE stream
        (StatusCode::ACCEPTED, "").into_response()
    } else {
        // No live stream for this session; answer in the body instead
        tracing::warn!(
            "No SSE session {}, returning response in HTTP body",
            params.session_id
        );
        Json(response).into_response()
    }
}
