// src/commands.rs
use anyhow::{bail, Context};
use clap::{Subcommand, ValueEnum};
use log::{info, warn};

use rusbit_announce::bencode::{bvalue_to_json, decode_bencode, BValue};
use rusbit_announce::tracker::{AnnounceClient, AnnounceOutcome, Session};
use rusbit_announce::utils;
use rusbit_announce::Config;

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a bencoded string and print it as JSON
    Decode { input: String },

    /// Announce to a tracker and print the peers it returns
    Announce {
        /// Tracker announce URL
        #[arg(long)]
        tracker: String,

        /// Info hash as 40 hex characters
        #[arg(long)]
        info_hash: String,

        /// Exactly 20 bytes; generated from the configured prefix if omitted
        #[arg(long)]
        peer_id: Option<String>,

        /// Listening port to advertise (defaults to the configured one)
        #[arg(long)]
        port: Option<u16>,

        #[arg(long, default_value_t = 0)]
        uploaded: u64,

        #[arg(long, default_value_t = 0)]
        downloaded: u64,

        #[arg(long, default_value_t = 0)]
        left: u64,

        #[arg(long, value_enum, default_value_t = Event::Empty)]
        event: Event,

        /// Number of peers to ask for
        #[arg(long)]
        numwant: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Event {
    Started,
    Stopped,
    Completed,
    Empty,
}

impl Event {
    fn as_str(self) -> &'static str {
        match self {
            Event::Started => "started",
            Event::Stopped => "stopped",
            Event::Completed => "completed",
            Event::Empty => "",
        }
    }
}

pub fn use_command(config_path: &str, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Decode { input } => {
            let (consumed, value) = decode_bencode(input.as_bytes())?;
            if consumed < input.len() {
                warn!("ignoring {} trailing bytes", input.len() - consumed);
            }
            println!("{}", serde_json::to_string(&bvalue_to_json(&value))?);
        }
        Commands::Announce {
            tracker,
            info_hash,
            peer_id,
            port,
            uploaded,
            downloaded,
            left,
            event,
            numwant,
        } => {
            let mut config = Config::load(config_path)?;
            if numwant.is_some() {
                config.numwant = numwant;
            }

            let info_hash = utils::parse_hex_id(&info_hash).context("invalid --info-hash")?;
            let peer_id = match peer_id {
                Some(id) => {
                    let bytes = id.as_bytes();
                    if bytes.len() != 20 {
                        bail!("--peer-id must be exactly 20 bytes, got {}", bytes.len());
                    }
                    let mut out = [0u8; 20];
                    out.copy_from_slice(bytes);
                    out
                }
                None => utils::generate_peer_id(&config.peer_id_prefix),
            };

            let session = Session::new(
                tracker,
                info_hash,
                peer_id,
                port.unwrap_or(config.listen_port),
            );
            let mut client = AnnounceClient::from_config(session, &config)?;

            match client.announce(uploaded, downloaded, left, event.as_str())? {
                AnnounceOutcome::Peers(response) => {
                    info!(
                        "interval {}s, {} peers",
                        response.interval,
                        response.peers.len()
                    );
                    if let Some(warning) = &response.warning_message {
                        warn!("tracker warning: {}", warning);
                    }
                    for peer in &response.peers {
                        match (peer.ip(), peer.port()) {
                            (Some(ip), Some(port)) => println!("{}:{}", ip, port),
                            _ => println!("{}", bvalue_to_json(&BValue::Dict(peer.as_dict().clone()))),
                        }
                    }
                }
                AnnounceOutcome::Declined { reason } => {
                    bail!("tracker declined the announce: {}", reason);
                }
            }
        }
    }
    Ok(())
}
