use std::io::Read;

use log::debug;

use super::error::BencodeError;
use crate::bencode::bvalue::{BDict, BValue};

/// Lists and dictionaries nested deeper than this are rejected.
pub const MAX_DEPTH: usize = 256;

/// Decodes the first bencoded value in `input`.
///
/// Returns the number of bytes consumed along with the value, so a caller can
/// continue decoding from `&input[consumed..]`.
pub fn decode_bencode(input: &[u8]) -> Result<(usize, BValue), BencodeError> {
	let mut decoder = Decoder::new(input);
	let value = decoder.decode_next()?;
	Ok((decoder.position(), value))
}

/// Reads `reader` to the end and decodes one value from it.
///
/// Bytes after the first complete value are ignored.
pub fn decode_from_reader<R: Read>(mut reader: R) -> Result<BValue, BencodeError> {
	let mut buf = Vec::new();
	reader.read_to_end(&mut buf)?;

	let (consumed, value) = decode_bencode(&buf)?;
	if consumed < buf.len() {
		debug!("ignoring {} trailing bytes after bencode value", buf.len() - consumed);
	}
	Ok(value)
}

/// Cursor over a byte buffer holding one or more bencoded values.
pub struct Decoder<'a> {
	input: &'a [u8],
	pos: usize,
	depth: usize,
}

impl<'a> Decoder<'a> {
	pub fn new(input: &'a [u8]) -> Self {
		Self {
			input,
			pos: 0,
			depth: 0,
		}
	}

	/// Offset of the next undecoded byte.
	pub fn position(&self) -> usize {
		self.pos
	}

	pub fn is_exhausted(&self) -> bool {
		self.pos >= self.input.len()
	}

	/// Decodes the value at the cursor. On error the cursor does not move.
	pub fn decode_next(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos;
		self.depth = 0;
		let result = self.decode_value();
		if result.is_err() {
			self.pos = start;
		}
		result
	}

	fn peek(&self) -> Option<u8> {
		self.input.get(self.pos).copied()
	}

	fn decode_value(&mut self) -> Result<BValue, BencodeError> {
		match self.peek() {
			None => Err(BencodeError::UnexpectedEnd),
			Some(b'i') => self.decode_integer(),
			Some(b'l') => self.decode_list(),
			Some(b'd') => self.decode_dict(),
			Some(c) if c.is_ascii_digit() => self.decode_string(),
			Some(c) => Err(BencodeError::UnexpectedByte {
				byte: c,
				offset: self.pos,
			}),
		}
	}

	/// Decodes `i<digits>e`.
	fn decode_integer(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos;
		let malformed = |reason: &str| BencodeError::MalformedInteger {
			offset: start,
			reason: reason.to_string(),
		};

		let body_start = start + 1; // skip 'i'
		let end = self.input[body_start..]
			.iter()
			.position(|&b| b == b'e')
			.map(|p| body_start + p)
			.ok_or_else(|| malformed("missing terminating 'e'"))?;

		let body = &self.input[body_start..end];
		let digits = body.strip_prefix(b"-").unwrap_or(body);

		if digits.is_empty() {
			return Err(malformed("no digits"));
		}
		if !digits.iter().all(u8::is_ascii_digit) {
			return Err(malformed("non-digit character"));
		}
		// Leading zeros are not allowed, and neither is "-0"
		if digits.len() > 1 && digits[0] == b'0' {
			return Err(malformed("leading zero"));
		}
		if digits == b"0" && body.len() > digits.len() {
			return Err(malformed("negative zero"));
		}

		// all bytes are ASCII here
		let num_str = std::str::from_utf8(body).map_err(|_| malformed("non-ASCII data"))?;
		let parsed = num_str
			.parse::<i64>()
			.map_err(|e| malformed(&format!("'{}': {}", num_str, e)))?;

		// add 1 to account for 'e'
		self.pos = end + 1;
		Ok(BValue::Integer(parsed))
	}

	/// Decodes `<length>:<bytes>`.
	fn decode_string(&mut self) -> Result<BValue, BencodeError> {
		let bytes = self.read_string_bytes()?;
		Ok(BValue::ByteString(bytes))
	}

	fn read_string_bytes(&mut self) -> Result<Vec<u8>, BencodeError> {
		let start = self.pos;
		let malformed = |reason: String| BencodeError::MalformedLength {
			offset: start,
			reason,
		};

		let digit_count = self.input[start..]
			.iter()
			.take_while(|b| b.is_ascii_digit())
			.count();
		if digit_count == 0 {
			return Err(malformed("missing length prefix".to_string()));
		}

		let colon = start + digit_count;
		match self.input.get(colon) {
			Some(b':') => {}
			Some(&b) => return Err(malformed(format!("expected ':' but found 0x{:02x}", b))),
			None => return Err(malformed("missing ':'".to_string())),
		}

		let len_str = std::str::from_utf8(&self.input[start..colon])
			.map_err(|_| malformed("non-ASCII length".to_string()))?;
		let length = len_str
			.parse::<usize>()
			.map_err(|e| malformed(format!("'{}': {}", len_str, e)))?;

		let data_start = colon + 1;
		let available = self.input.len() - data_start;
		if length > available {
			return Err(BencodeError::TruncatedString {
				offset: start,
				expected: length,
				available,
			});
		}

		let data_end = data_start + length;
		self.pos = data_end;
		Ok(self.input[data_start..data_end].to_vec())
	}

	/// Decodes `l<items>e`.
	fn decode_list(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos;
		self.enter(start)?;
		self.pos += 1; // skip 'l'

		let mut items = Vec::new();
		loop {
			match self.peek() {
				None => return Err(BencodeError::UnterminatedList { offset: start }),
				Some(b'e') => break,
				Some(_) => items.push(self.decode_value()?),
			}
		}

		// add 1 to account for 'e'
		self.pos += 1;
		self.depth -= 1;
		Ok(BValue::List(items))
	}

	/// Decodes `d<key><value>...e`. Keys must be byte strings.
	fn decode_dict(&mut self) -> Result<BValue, BencodeError> {
		let start = self.pos;
		self.enter(start)?;
		self.pos += 1; // skip 'd'

		let mut dict = BDict::new();
		loop {
			let key = match self.peek() {
				None => return Err(BencodeError::UnterminatedDict { offset: start }),
				Some(b'e') => break,
				Some(c) if c.is_ascii_digit() => self.read_string_bytes()?,
				Some(c) => {
					let found = match c {
						b'i' => "integer",
						b'l' => "list",
						b'd' => "dictionary",
						_ => {
							return Err(BencodeError::UnexpectedByte {
								byte: c,
								offset: self.pos,
							})
						}
					};
					return Err(BencodeError::NonStringKey {
						offset: self.pos,
						found,
					});
				}
			};

			// a key must be followed by a value before the closing 'e'
			if matches!(self.peek(), None | Some(b'e')) {
				return Err(BencodeError::UnterminatedDict { offset: start });
			}
			let value = self.decode_value()?;
			dict.insert(key, value);
		}

		// add 1 to account for 'e'
		self.pos += 1;
		self.depth -= 1;
		Ok(BValue::Dict(dict))
	}

	fn enter(&mut self, offset: usize) -> Result<(), BencodeError> {
		if self.depth >= MAX_DEPTH {
			return Err(BencodeError::NestingTooDeep {
				offset,
				limit: MAX_DEPTH,
			});
		}
		self.depth += 1;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn bytes(s: &str) -> BValue {
		BValue::ByteString(s.as_bytes().to_vec())
	}

	#[test]
	fn test_decode_integer() {
		let input = b"i42e";
		let (consumed, value) = decode_bencode(input).unwrap();
		assert_eq!(consumed, input.len());
		assert_eq!(value, BValue::Integer(42));
	}

	#[test]
	fn test_decode_negative_integer() {
		let input = b"i-13e";
		let (consumed, value) = decode_bencode(input).unwrap();
		assert_eq!(consumed, input.len());
		assert_eq!(value, BValue::Integer(-13));
	}

	#[test]
	fn test_decode_integer_zero() {
		let (_, value) = decode_bencode(b"i0e").unwrap();
		assert_eq!(value, BValue::Integer(0));
	}

	#[test]
	fn test_decode_string() {
		let input = b"4:spam";
		let (consumed, value) = decode_bencode(input).unwrap();
		assert_eq!(consumed, input.len());
		assert_eq!(value, bytes("spam"));
	}

	#[test]
	fn test_decode_empty_string() {
		let (consumed, value) = decode_bencode(b"0:").unwrap();
		assert_eq!(consumed, 2);
		assert_eq!(value, BValue::ByteString(Vec::new()));
	}

	#[test]
	fn test_decode_binary_string() {
		let input = [b'3', b':', 0x00, 0xff, b'e'];
		let (_, value) = decode_bencode(&input).unwrap();
		assert_eq!(value, BValue::ByteString(vec![0x00, 0xff, b'e']));
	}

	#[test]
	fn test_decode_list() {
		let input = b"l4:spam4:eggse";
		let (consumed, value) = decode_bencode(input).unwrap();
		assert_eq!(consumed, input.len());
		assert_eq!(value, BValue::List(vec![bytes("spam"), bytes("eggs")]));
	}

	#[test]
	fn test_decode_empty_list() {
		let (_, value) = decode_bencode(b"le").unwrap();
		assert_eq!(value, BValue::List(Vec::new()));
	}

	#[test]
	fn test_decode_nested_list() {
		// ["spam", ["egg", 3]]
		let input = b"l4:spaml3:eggi3eee";
		let (consumed, value) = decode_bencode(input).unwrap();
		assert_eq!(consumed, input.len());
		assert_eq!(
			value,
			BValue::List(vec![
				bytes("spam"),
				BValue::List(vec![bytes("egg"), BValue::Integer(3)]),
			])
		);
	}

	#[test]
	fn test_decode_dict() {
		let input = b"d3:bar4:spam3:fooi42ee";
		let (consumed, value) = decode_bencode(input).unwrap();
		assert_eq!(consumed, input.len());

		let expected: BDict = [("bar", bytes("spam")), ("foo", BValue::Integer(42))]
			.into_iter()
			.collect();
		assert_eq!(value, BValue::Dict(expected));
	}

	#[test]
	fn test_decode_empty_dict() {
		let (_, value) = decode_bencode(b"de").unwrap();
		assert_eq!(value, BValue::Dict(BDict::new()));
	}

	#[test]
	fn test_decode_dict_with_nested_list() {
		// {"foo": ["spam", 1], "bar": "eggs"}
		let input = b"d3:fool4:spami1ee3:bar4:eggse";
		let (_, value) = decode_bencode(input).unwrap();
		let dict = value.as_dict().unwrap();
		assert_eq!(
			dict.get("foo"),
			Some(&BValue::List(vec![bytes("spam"), BValue::Integer(1)]))
		);
		assert_eq!(dict.get("bar"), Some(&bytes("eggs")));
	}

	#[test]
	fn test_decoder_consecutive_values() {
		let mut decoder = Decoder::new(b"i1e4:spamle");
		assert_eq!(decoder.decode_next().unwrap(), BValue::Integer(1));
		assert_eq!(decoder.position(), 3);
		assert_eq!(decoder.decode_next().unwrap(), bytes("spam"));
		assert_eq!(decoder.decode_next().unwrap(), BValue::List(Vec::new()));
		assert!(decoder.is_exhausted());
		assert!(matches!(decoder.decode_next(), Err(BencodeError::UnexpectedEnd)));
	}

	#[test]
	fn test_decoder_error_leaves_cursor() {
		let mut decoder = Decoder::new(b"i1el4:spam");
		decoder.decode_next().unwrap();
		assert!(decoder.decode_next().is_err());
		assert_eq!(decoder.position(), 3);
	}

	#[test]
	fn test_decode_from_reader() {
		let value = decode_from_reader(&b"d2:hii7ee"[..]).unwrap();
		assert_eq!(value.as_dict().unwrap().get("hi"), Some(&BValue::Integer(7)));
	}

	//
	// Malformed Inputs: Test expected failures
	//

	#[test]
	fn test_decode_empty_input() {
		assert!(matches!(decode_bencode(b""), Err(BencodeError::UnexpectedEnd)));
	}

	#[test]
	fn test_decode_integer_without_digits() {
		assert!(matches!(
			decode_bencode(b"i-e"),
			Err(BencodeError::MalformedInteger { .. })
		));
		assert!(matches!(
			decode_bencode(b"ie"),
			Err(BencodeError::MalformedInteger { .. })
		));
	}

	#[test]
	fn test_decode_integer_missing_e() {
		assert!(matches!(
			decode_bencode(b"i42"),
			Err(BencodeError::MalformedInteger { .. })
		));
	}

	#[test]
	fn test_decode_integer_rejects_bad_forms() {
		for input in [
			&b"i0123e"[..],
			&b"i-0e"[..],
			&b"i4x2e"[..],
			&b"i99999999999999999999e"[..],
		] {
			assert!(
				matches!(decode_bencode(input), Err(BencodeError::MalformedInteger { .. })),
				"{:?} should be rejected",
				String::from_utf8_lossy(input)
			);
		}
	}

	#[test]
	fn test_decode_string_truncated() {
		match decode_bencode(b"5:ab") {
			Err(BencodeError::TruncatedString {
				expected, available, ..
			}) => {
				assert_eq!(expected, 5);
				assert_eq!(available, 2);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_decode_string_missing_colon() {
		assert!(matches!(
			decode_bencode(b"5hello"),
			Err(BencodeError::MalformedLength { .. })
		));
		assert!(matches!(
			decode_bencode(b"12"),
			Err(BencodeError::MalformedLength { .. })
		));
	}

	#[test]
	fn test_decode_list_unclosed() {
		assert!(matches!(
			decode_bencode(b"l"),
			Err(BencodeError::UnterminatedList { offset: 0 })
		));
		assert!(matches!(
			decode_bencode(b"l4:spam"),
			Err(BencodeError::UnterminatedList { .. })
		));
	}

	#[test]
	fn test_decode_dict_unclosed() {
		assert!(matches!(
			decode_bencode(b"d3:foo4:spam"),
			Err(BencodeError::UnterminatedDict { .. })
		));
		assert!(matches!(
			decode_bencode(b"d3:foo"),
			Err(BencodeError::UnterminatedDict { .. })
		));
	}

	#[test]
	fn test_decode_dict_key_without_value() {
		assert!(matches!(
			decode_bencode(b"d3:fooe"),
			Err(BencodeError::UnterminatedDict { offset: 0 })
		));
		assert!(matches!(
			decode_bencode(b"d3:bari1e3:fooe"),
			Err(BencodeError::UnterminatedDict { offset: 0 })
		));
	}

	#[test]
	fn test_decode_dict_key_not_string() {
		match decode_bencode(b"di42e4:spame") {
			Err(BencodeError::NonStringKey { offset, found }) => {
				assert_eq!(offset, 1);
				assert_eq!(found, "integer");
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_decode_unexpected_byte() {
		assert!(matches!(
			decode_bencode(b"x"),
			Err(BencodeError::UnexpectedByte { byte: b'x', offset: 0 })
		));
	}

	#[test]
	fn test_decode_nesting_limit() {
		let mut input = vec![b'l'; MAX_DEPTH + 1];
		input.extend(vec![b'e'; MAX_DEPTH + 1]);
		assert!(matches!(
			decode_bencode(&input),
			Err(BencodeError::NestingTooDeep { .. })
		));

		let mut input = vec![b'l'; MAX_DEPTH];
		input.extend(vec![b'e'; MAX_DEPTH]);
		assert!(decode_bencode(&input).is_ok());
	}
}
