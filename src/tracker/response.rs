use log::trace;

use crate::bencode::{BDict, BValue};

use super::error::AnnounceError;

/// One element of the tracker's `peers` list, kept as the dictionary the tracker sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEntry(BDict);

impl PeerEntry {
	pub fn as_dict(&self) -> &BDict {
		&self.0
	}

	pub fn into_dict(self) -> BDict {
		self.0
	}

	pub fn peer_id(&self) -> Option<&[u8]> {
		self.0.get("peer id").and_then(BValue::as_bytes)
	}

	/// IP address or DNS name, if present and valid UTF-8.
	pub fn ip(&self) -> Option<&str> {
		self.0
			.get("ip")
			.and_then(BValue::as_bytes)
			.and_then(|b| std::str::from_utf8(b).ok())
	}

	pub fn port(&self) -> Option<u16> {
		self.0
			.get("port")
			.and_then(BValue::as_integer)
			.and_then(|p| u16::try_from(p).ok())
	}
}

/// A successful announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceResponse {
	/// Seconds to wait before the next regular announce.
	pub interval: u64,
	pub min_interval: Option<u64>,
	pub tracker_id: Option<Vec<u8>>,
	/// Seeders.
	pub complete: Option<u64>,
	/// Leechers.
	pub incomplete: Option<u64>,
	pub warning_message: Option<String>,
	/// In the order the tracker listed them.
	pub peers: Vec<PeerEntry>,
}

/// What the tracker said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceOutcome {
	Peers(AnnounceResponse),
	/// The tracker understood the request and refused it.
	Declined { reason: String },
}

fn shape(msg: impl Into<String>) -> AnnounceError {
	AnnounceError::UnexpectedResponseShape(msg.into())
}

/// Validates a decoded tracker response.
///
/// Checks run in a fixed order: root kind, `failure reason`, `interval`, `peers`,
/// then each peer. The first violation wins and no peers are returned with it.
pub fn parse_announce_response(root: BValue) -> Result<AnnounceOutcome, AnnounceError> {
	let mut dict = match root {
		BValue::Dict(d) => d,
		other => {
			return Err(shape(format!(
				"root is a {}, expected a dictionary",
				other.kind()
			)))
		}
	};

	if let Some(reason) = dict.get("failure reason") {
		let reason = reason.as_bytes().ok_or_else(|| {
			shape(format!("'failure reason' is a {}, expected a string", reason.kind()))
		})?;
		return Ok(AnnounceOutcome::Declined {
			reason: String::from_utf8_lossy(reason).into_owned(),
		});
	}

	let interval = dict
		.get("interval")
		.ok_or_else(|| shape("missing 'interval'"))
		.and_then(|v| {
			read_count(v).ok_or_else(|| shape(format!("'interval' is not a non-negative integer: {:?}", v)))
		})?;

	let items = match dict.remove("peers") {
		Some(BValue::List(items)) => items,
		Some(other) => return Err(shape(format!("'peers' is a {}, expected a list", other.kind()))),
		None => return Err(shape("missing 'peers'")),
	};

	let mut peers = Vec::with_capacity(items.len());
	for (idx, item) in items.into_iter().enumerate() {
		match item {
			BValue::Dict(d) => peers.push(PeerEntry(d)),
			other => {
				return Err(shape(format!(
					"peer #{} is a {}, expected a dictionary",
					idx,
					other.kind()
				)))
			}
		}
	}

	Ok(AnnounceOutcome::Peers(AnnounceResponse {
		interval,
		min_interval: optional_count(&dict, "min interval"),
		tracker_id: dict
			.get("tracker id")
			.and_then(BValue::as_bytes)
			.map(<[u8]>::to_vec),
		complete: optional_count(&dict, "complete"),
		incomplete: optional_count(&dict, "incomplete"),
		warning_message: dict
			.get("warning message")
			.and_then(BValue::as_bytes)
			.map(|b| String::from_utf8_lossy(b).into_owned()),
		peers,
	}))
}

/// A non-negative count, sent either as a bencode integer or as decimal digits.
fn read_count(value: &BValue) -> Option<u64> {
	match value {
		BValue::Integer(i) => u64::try_from(*i).ok(),
		BValue::ByteString(b) if !b.is_empty() && b.iter().all(u8::is_ascii_digit) => {
			std::str::from_utf8(b).ok()?.parse().ok()
		}
		_ => None,
	}
}

fn optional_count(dict: &BDict, key: &str) -> Option<u64> {
	let value = dict.get(key)?;
	let count = read_count(value);
	if count.is_none() {
		trace!("ignoring malformed '{}' in tracker response", key);
	}
	count
}
