//! Telephony channel boundary: wire events, answer markup, outbound dialing.
//!
//! Inbound socket frames are decoded once here into `TelephonyEvent`;
//! everything downstream works with typed variants rather than raw JSON.

pub mod dialer;
pub mod events;
pub mod twiml;

pub use dialer::Dialer;
pub use events::{MediaPayload, OutboundPayload, StreamStart, TelephonyEvent, TelephonyOutbound};
