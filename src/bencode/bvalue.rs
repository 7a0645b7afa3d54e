/// A decoded bencode value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
	ByteString(Vec<u8>), // raw bytes, not necessarily UTF-8
	Integer(i64),
	List(Vec<BValue>),
	Dict(BDict),
}

impl BValue {
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			BValue::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			BValue::ByteString(b) => Some(b),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[BValue]> {
		match self {
			BValue::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_dict(&self) -> Option<&BDict> {
		match self {
			BValue::Dict(d) => Some(d),
			_ => None,
		}
	}

	/// Name of the active variant, for error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			BValue::ByteString(_) => "byte string",
			BValue::Integer(_) => "integer",
			BValue::List(_) => "list",
			BValue::Dict(_) => "dictionary",
		}
	}
}

/// Bencode dictionary keyed by raw bytes.
///
/// Entries keep the order they were inserted in, so a decoded document encodes
/// back to the same bytes. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BDict {
	entries: Vec<(Vec<u8>, BValue)>,
}

impl BDict {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: BValue) -> Option<BValue> {
		let key = key.into();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => Some(std::mem::replace(existing, value)),
			None => {
				self.entries.push((key, value));
				None
			}
		}
	}

	pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&BValue> {
		let key = key.as_ref();
		self.entries
			.iter()
			.find(|(k, _)| k.as_slice() == key)
			.map(|(_, v)| v)
	}

	pub fn remove(&mut self, key: impl AsRef<[u8]>) -> Option<BValue> {
		let key = key.as_ref();
		let idx = self.entries.iter().position(|(k, _)| k.as_slice() == key)?;
		Some(self.entries.remove(idx).1)
	}

	pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
		self.get(key).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&[u8], &BValue)> {
		self.entries.iter().map(|(k, v)| (k.as_slice(), v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<Vec<u8>>> FromIterator<(K, BValue)> for BDict {
	fn from_iter<I: IntoIterator<Item = (K, BValue)>>(iter: I) -> Self {
		let mut dict = BDict::new();
		for (k, v) in iter {
			dict.insert(k, v);
		}
		dict
	}
}
