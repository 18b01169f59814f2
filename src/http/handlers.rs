use super::state::AppState;
use crate::recognition::RecognitionClient;
use crate::session::{CallSession, SessionDeps, SessionStats, TranscriptTurn};
use crate::telephony::twiml;
use axum::{
    extract::{ws::WebSocketUpgrade, Host, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct DialRequest {
    /// Number to call; defaults to the configured candidate's number.
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DialResponse {
    pub call_sid: String,
    pub to: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET|POST /call/incoming
/// Telephony webhook: answer with markup connecting the call audio to the
/// media stream endpoint.
pub async fn incoming_call(Host(host): Host) -> Response {
    info!("Incoming call; connecting stream via {}", host);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        twiml::connect_stream_response(&host),
    )
        .into_response()
}

/// GET /media-stream
/// One upgraded socket is one call. The recognition channel is connected
/// before the session exists: a recognizer that is unreachable at start
/// aborts the call before bootstrap.
pub async fn media_stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| async move {
        info!("Telephony client connected");

        let (sink, stream) = match RecognitionClient::connect(&state.config.recognition).await {
            Ok(halves) => halves,
            Err(e) => {
                error!("Session aborted, recognition unavailable: {}", e);
                return;
            }
        };

        let session = Arc::new(CallSession::new(SessionDeps {
            sink: Arc::new(sink),
            model: Arc::clone(&state.model),
            store: Arc::clone(&state.store),
            writer: Arc::clone(&state.transcript_writer),
            interview: state.config.interview.clone(),
            candidate_uid: state.candidate.uid.clone(),
        }));

        session
            .run(
                socket,
                stream,
                Arc::clone(&state.sessions),
                state.config.recognition.clone(),
            )
            .await;
    })
}

/// POST /calls/dial
/// Place the outbound screening call.
pub async fn dial(
    State(state): State<AppState>,
    body: Option<Json<DialRequest>>,
) -> impl IntoResponse {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let to = match req.to.or_else(|| state.candidate.phone.clone()) {
        Some(to) => to,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No number to dial: none given and candidate has no phone".to_string(),
                }),
            )
                .into_response();
        }
    };

    match state.dialer.dial(&to).await {
        Ok(call_sid) => (
            StatusCode::OK,
            Json(DialResponse {
                call_sid,
                to,
                status: "initiated".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to initiate call: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Failed to initiate call: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions
/// List active stream ids.
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    Json(SessionListResponse {
        sessions: sessions.keys().cloned().collect(),
    })
}

/// GET /sessions/:stream_sid/status
/// Snapshot of one session.
pub async fn session_status(
    State(state): State<AppState>,
    Path(stream_sid): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&stream_sid) {
        Some(session) => {
            let stats: SessionStats = session.stats().await;
            (StatusCode::OK, Json(stats)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", stream_sid),
            }),
        )
            .into_response(),
    }
}

/// GET /sessions/:stream_sid/transcript
/// Transcript accumulated so far.
pub async fn session_transcript(
    State(state): State<AppState>,
    Path(stream_sid): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&stream_sid) {
        Some(session) => {
            let transcript: Vec<TranscriptTurn> = session.transcript_snapshot().await;
            (StatusCode::OK, Json(transcript)).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session {} not found", stream_sid),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
