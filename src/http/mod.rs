//! HTTP control surface: telephony webhook, media WebSocket, outbound
//! dialing, and session queries.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
