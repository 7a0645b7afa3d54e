use crate::utils::url_encode_bytes;

use super::session::Session;

/// Per-announce parameters supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct AnnounceParams<'a> {
	pub uploaded: u64,
	pub downloaded: u64,
	pub left: u64,
	/// `started`, `stopped`, `completed` or empty. Passed through unchecked.
	pub event: &'a str,
	pub numwant: Option<u32>,
	pub key: Option<&'a [u8]>,
	pub tracker_id: Option<&'a [u8]>,
	/// Address to advertise instead of the one the request comes from.
	pub ip: Option<&'a str>,
	/// Lets the tracker leave `peer id` out of each peer entry.
	pub no_peer_id: bool,
}

/// Builds the full announce URL for `session` and `params`.
pub fn build_announce_url(session: &Session, params: &AnnounceParams<'_>) -> String {
	let base = session.tracker_url();
	let separator = if base.contains('?') { '&' } else { '?' };

	let mut url = format!(
		"{base}{sep}info_hash={info_hash}&peer_id={peer_id}&port={port}&uploaded={uploaded}&downloaded={downloaded}&left={left}&event={event}",
		base       = base,
		sep        = separator,
		info_hash  = url_encode_bytes(session.info_hash()),
		peer_id    = url_encode_bytes(session.peer_id()),
		port       = session.listen_port(),
		uploaded   = params.uploaded,
		downloaded = params.downloaded,
		left       = params.left,
		event      = url_encode_bytes(params.event.as_bytes()),
	);

	if let Some(numwant) = params.numwant {
		url.push_str(&format!("&numwant={}", numwant));
	}
	if let Some(key) = params.key {
		url.push_str(&format!("&key={}", url_encode_bytes(key)));
	}
	if let Some(tracker_id) = params.tracker_id {
		url.push_str(&format!("&trackerid={}", url_encode_bytes(tracker_id)));
	}
	if let Some(ip) = params.ip {
		url.push_str(&format!("&ip={}", url_encode_bytes(ip.as_bytes())));
	}
	if params.no_peer_id {
		url.push_str("&no_peer_id=1");
	}
	url
}

#[cfg(test)]
mod tests {
	use super::*;

	fn session(url: &str) -> Session {
		Session::new(url, [0xab; 20], *b"-RB0001-123456789012", 6881)
	}

	#[test]
	fn test_build_url_parameters() {
		let params = AnnounceParams {
			uploaded: 10,
			downloaded: 20,
			left: 30,
			event: "started",
			..Default::default()
		};
		let url = build_announce_url(&session("http://tracker.example/announce"), &params);
		assert_eq!(
			url,
			format!(
				"http://tracker.example/announce?info_hash={}&peer_id=-RB0001-123456789012&port=6881&uploaded=10&downloaded=20&left=30&event=started",
				"%AB".repeat(20)
			)
		);
	}

	#[test]
	fn test_existing_query_uses_ampersand() {
		let url = build_announce_url(
			&session("http://tracker.example/announce?passkey=abc"),
			&AnnounceParams::default(),
		);
		assert!(url.starts_with("http://tracker.example/announce?passkey=abc&info_hash="));
		assert!(url.ends_with("&event="));
	}

	#[test]
	fn test_optional_parameters() {
		let params = AnnounceParams {
			numwant: Some(50),
			key: Some(b"k 1"),
			tracker_id: Some(b"id/2"),
			..Default::default()
		};
		let url = build_announce_url(&session("http://t/a"), &params);
		assert!(url.ends_with("&numwant=50&key=k%201&trackerid=id%2F2"));
	}

	#[test]
	fn test_ip_and_no_peer_id() {
		let params = AnnounceParams {
			ip: Some("2001:db8::1"),
			no_peer_id: true,
			..Default::default()
		};
		let url = build_announce_url(&session("http://t/a"), &params);
		assert!(url.ends_with("&event=&ip=2001%3Adb8%3A%3A1&no_peer_id=1"));

		let url = build_announce_url(&session("http://t/a"), &AnnounceParams::default());
		assert!(!url.contains("&ip="));
		assert!(!url.contains("no_peer_id"));
	}

	#[test]
	fn test_raw_bytes_never_leak_into_query() {
		let mut info_hash = [0u8; 20];
		for (i, b) in info_hash.iter_mut().enumerate() {
			*b = (i as u8) * 13; // spans control chars and high bytes
		}
		let peer_id = *b"\x00\x01 &=?#%\xff\xfe-RB0001-xy";
		let s = Session::new("http://t/a", info_hash, peer_id, 1);
		let url = build_announce_url(&s, &AnnounceParams::default());
		let query = &url["http://t/a?".len()..];

		for pair in query.split('&') {
			let (_, value) = pair.split_once('=').unwrap();
			assert!(
				value.bytes().all(|b| crate::utils::is_unreserved(b) || b == b'%'),
				"raw byte in {:?}",
				pair
			);
		}
	}
}
