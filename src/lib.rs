// lib.rs - Library interface for the tracker announce client

pub mod bencode;
pub mod config;
pub mod tracker;
pub mod utils;

// Re-export commonly used types
pub use bencode::{decode_bencode, BDict, BValue, BencodeError};
pub use config::Config;
pub use tracker::{
    AnnounceClient, AnnounceError, AnnounceOutcome, AnnounceResponse, AnnounceState, PeerEntry,
    Session,
};
