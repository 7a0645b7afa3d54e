mod url_encode;

pub use url_encode::{is_unreserved, url_encode_bytes};
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Builds a 20-byte peer id: the client prefix (e.g. `-RB0001-`) followed by
/// random alphanumeric bytes. A prefix longer than 20 bytes is cut off.
pub fn generate_peer_id(prefix: &str) -> [u8; 20] {
	let mut peer_id = [0u8; 20];
	let prefix = prefix.as_bytes();
	let n = prefix.len().min(peer_id.len());
	peer_id[..n].copy_from_slice(&prefix[..n]);

	let mut rng = rand::thread_rng();
	for slot in &mut peer_id[n..] {
		*slot = rng.sample(Alphanumeric);
	}
	peer_id
}

/// Parses a 40-character hex string into a 20-byte id.
pub fn parse_hex_id(input: &str) -> Result<[u8; 20], hex::FromHexError> {
	let mut id = [0u8; 20];
	hex::decode_to_slice(input.trim(), &mut id)?;
	Ok(id)
}
