pub mod bvalue;
pub mod decode;
pub mod encode;
pub mod error;

pub use bvalue::{BDict, BValue};   // re-export
pub use decode::{decode_bencode, decode_from_reader, Decoder};   // re-export
pub use encode::{bvalue_to_json, encode_bvalue};   // re-export
pub use error::BencodeError;
