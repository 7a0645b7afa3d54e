use thiserror::Error;

/// Grammar violations reported by the decoder. Offsets are byte positions in the input.
#[derive(Debug, Error)]
pub enum BencodeError {
	#[error("Unexpected end of input")]
	UnexpectedEnd,

	#[error("Unexpected byte 0x{byte:02x} at offset {offset}")]
	UnexpectedByte { byte: u8, offset: usize },

	#[error("Malformed integer at offset {offset}: {reason}")]
	MalformedInteger { offset: usize, reason: String },

	#[error("Malformed string length at offset {offset}: {reason}")]
	MalformedLength { offset: usize, reason: String },

	#[error("String at offset {offset} declares {expected} bytes but only {available} remain")]
	TruncatedString {
		offset: usize,
		expected: usize,
		available: usize,
	},

	#[error("Unclosed list starting at offset {offset} (missing 'e')")]
	UnterminatedList { offset: usize },

	#[error("Unclosed dictionary starting at offset {offset} (missing 'e')")]
	UnterminatedDict { offset: usize },

	#[error("Dictionary key at offset {offset} is a {found}, expected a byte string")]
	NonStringKey { offset: usize, found: &'static str },

	#[error("Nesting deeper than {limit} levels at offset {offset}")]
	NestingTooDeep { offset: usize, limit: usize },

	#[error("I/O error while reading bencode stream: {0}")]
	Io(#[from] std::io::Error),
}
