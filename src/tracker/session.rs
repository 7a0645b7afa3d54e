/// Identity a client presents to one tracker. Fixed for the lifetime of an
/// [`AnnounceClient`](super::AnnounceClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	tracker_url: String,
	info_hash: [u8; 20],
	peer_id: [u8; 20],
	listen_port: u16,
}

impl Session {
	/// Stores the fields as given. The URL is not checked until the first announce.
	pub fn new(
		tracker_url: impl Into<String>,
		info_hash: [u8; 20],
		peer_id: [u8; 20],
		listen_port: u16,
	) -> Self {
		Self {
			tracker_url: tracker_url.into(),
			info_hash,
			peer_id,
			listen_port,
		}
	}

	pub fn tracker_url(&self) -> &str {
		&self.tracker_url
	}

	pub fn info_hash(&self) -> &[u8; 20] {
		&self.info_hash
	}

	pub fn peer_id(&self) -> &[u8; 20] {
		&self.peer_id
	}

	pub fn listen_port(&self) -> u16 {
		self.listen_port
	}
}
