use std::time::Duration;

use log::debug;

use crate::bencode::decode_from_reader;
use crate::config::Config;

use super::error::{AnnounceError, TransportError};
use super::request::{build_announce_url, AnnounceParams};
use super::response::{parse_announce_response, AnnounceOutcome};
use super::session::Session;
use super::transport::{HttpTransport, ReqwestTransport};

const HTTP_OK: u16 = 200;

/// Values the tracker handed back on the last successful announce.
///
/// Nothing in this crate waits on `interval`; it is reported for whoever
/// schedules the next announce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnounceState {
	pub interval: Option<u64>,
	pub min_interval: Option<u64>,
	/// Echoed back as `trackerid` on later announces.
	pub tracker_id: Option<Vec<u8>>,
}

/// Announces one session to one tracker over a blocking transport.
pub struct AnnounceClient<T: HttpTransport = ReqwestTransport> {
	session: Session,
	transport: T,
	numwant: Option<u32>,
	key: Option<Vec<u8>>,
	ip: Option<String>,
	no_peer_id: bool,
	state: AnnounceState,
}

impl AnnounceClient<ReqwestTransport> {
	/// Client over `reqwest` using the timeout, user agent and `numwant` from `config`.
	pub fn from_config(session: Session, config: &Config) -> Result<Self, TransportError> {
		let transport = ReqwestTransport::new(
			Duration::from_secs(config.request_timeout),
			&config.user_agent,
		)?;
		let mut client = Self::new(session, transport);
		client.numwant = config.numwant;
		Ok(client)
	}
}

impl<T: HttpTransport> AnnounceClient<T> {
	/// No I/O happens here.
	pub fn new(session: Session, transport: T) -> Self {
		Self {
			session,
			transport,
			numwant: None,
			key: None,
			ip: None,
			no_peer_id: false,
			state: AnnounceState::default(),
		}
	}

	pub fn with_numwant(mut self, numwant: u32) -> Self {
		self.numwant = Some(numwant);
		self
	}

	/// Sets the private `key` parameter sent with every announce.
	pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Advertises `ip` instead of the address the request arrives from.
	pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
		self.ip = Some(ip.into());
		self
	}

	/// Asks the tracker to omit `peer id` from peer entries.
	pub fn with_no_peer_id(mut self) -> Self {
		self.no_peer_id = true;
		self
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn state(&self) -> &AnnounceState {
		&self.state
	}

	/// Performs one announce round-trip.
	///
	/// A tracker that refuses the request yields `Ok(AnnounceOutcome::Declined)`.
	/// `state()` is only updated when the tracker returns peers.
	pub fn announce(
		&mut self,
		uploaded: u64,
		downloaded: u64,
		left: u64,
		event: &str,
	) -> Result<AnnounceOutcome, AnnounceError> {
		let params = AnnounceParams {
			uploaded,
			downloaded,
			left,
			event,
			numwant: self.numwant,
			key: self.key.as_deref(),
			tracker_id: self.state.tracker_id.as_deref(),
			ip: self.ip.as_deref(),
			no_peer_id: self.no_peer_id,
		};
		let url = build_announce_url(&self.session, &params);
		debug!("announcing to {}", url);

		let response = self.transport.get(&url)?;
		if response.status != HTTP_OK {
			return Err(AnnounceError::HttpStatus {
				status: response.status,
			});
		}

		let root = decode_from_reader(response.body)?;
		let outcome = parse_announce_response(root)?;

		match &outcome {
			AnnounceOutcome::Peers(r) => {
				debug!(
					"tracker returned {} peers, next announce in {}s",
					r.peers.len(),
					r.interval
				);
				self.state.interval = Some(r.interval);
				self.state.min_interval = r.min_interval;
				if let Some(id) = &r.tracker_id {
					self.state.tracker_id = Some(id.clone());
				}
			}
			AnnounceOutcome::Declined { reason } => {
				debug!("tracker declined announce: {}", reason);
			}
		}
		Ok(outcome)
	}
}
