//! HTTP tracker announce: query building, transport and response validation.

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use client::{AnnounceClient, AnnounceState};
pub use error::{AnnounceError, TransportError};
pub use request::{build_announce_url, AnnounceParams};
pub use response::{parse_announce_response, AnnounceOutcome, AnnounceResponse, PeerEntry};
pub use session::Session;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
