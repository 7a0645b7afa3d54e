use thiserror::Error;

use crate::bencode::BencodeError;

/// The GET itself could not be completed.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("Tracker request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("I/O error talking to tracker: {0}")]
	Io(#[from] std::io::Error),
}

/// Reasons an announce produced neither peers nor a tracker-declared failure.
#[derive(Debug, Error)]
pub enum AnnounceError {
	#[error(transparent)]
	Transport(#[from] TransportError),

	#[error("Tracker answered with HTTP status {status}")]
	HttpStatus { status: u16 },

	#[error("Tracker response bencode error: {0}")]
	ResponseDecode(#[source] BencodeError),

	#[error("Unexpected response from tracker: {0}")]
	UnexpectedResponseShape(String),
}

impl From<BencodeError> for AnnounceError {
	fn from(err: BencodeError) -> Self {
		match err {
			// a failed body read is the transport's fault, not the tracker's
			BencodeError::Io(io) => AnnounceError::Transport(TransportError::Io(io)),
			other => AnnounceError::ResponseDecode(other),
		}
	}
}
