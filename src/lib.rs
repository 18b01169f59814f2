pub mod candidate;
pub mod config;
pub mod dialogue;
pub mod http;
pub mod model;
pub mod recognition;
pub mod scoring;
pub mod session;
pub mod store;
pub mod telephony;

pub use candidate::CandidateProfile;
pub use config::Config;
pub use dialogue::TurnEngine;
pub use http::{create_router, AppState};
pub use model::{CompletionModel, GeminiModel};
pub use recognition::{RecognitionClient, RecognitionMessage, RecognitionSink};
pub use session::{
    CallSession, LifecycleState, Role, SessionDeps, SessionStats, TranscriptLog, TranscriptTurn,
    TranscriptWriter,
};
pub use store::{MongoScreenStore, ScreenOutcome, ScreenStore};
pub use telephony::{Dialer, TelephonyEvent, TelephonyOutbound};
