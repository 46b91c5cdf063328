// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use s7read::endpoint::parse_tsap;
use s7read::{render, Config, ConnectionType, OutputFormat};

/// Reads a slice of a Siemens S7 Data Block and prints it.
///
/// Settings come from the defaults, then the config file, then the flags
/// (each flag can also be given through its environment variable).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "S7READ_CONFIG")]
    config: Option<PathBuf>,

    /// PLC endpoint, `host[:port]`
    #[arg(short, long, env = "S7READ_ADDRESS")]
    address: Option<String>,

    /// CPU rack
    #[arg(long, env = "S7READ_RACK")]
    rack: Option<u16>,

    /// CPU slot
    #[arg(long, env = "S7READ_SLOT")]
    slot: Option<u16>,

    /// Local TSAP (e.g. 0x0100), requires --remote-tsap
    #[arg(long, value_parser = tsap_arg)]
    local_tsap: Option<u16>,

    /// Remote TSAP (e.g. 0x0102), requires --local-tsap
    #[arg(long, value_parser = tsap_arg)]
    remote_tsap: Option<u16>,

    /// Connection type: pg, op or s7
    #[arg(long)]
    connection_type: Option<ConnectionType>,

    /// TCP connection timeout (ms)
    #[arg(long)]
    connect_timeout_ms: Option<u64>,

    /// Read timeout (ms)
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// DB number
    #[arg(short, long, env = "S7READ_DB")]
    db: Option<u16>,

    /// First byte to read
    #[arg(short, long)]
    start: Option<u16>,

    /// Number of bytes to read
    #[arg(short = 'n', long)]
    size: Option<u16>,

    /// Output format: plain or hex
    #[arg(short, long)]
    format: Option<OutputFormat>,
}

fn tsap_arg(s: &str) -> std::result::Result<u16, String> {
    parse_tsap(s).map_err(|e| e.to_string())
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };

        let plc = &mut config.plc;
        if let Some(address) = self.address {
            plc.address = address;
        }
        if let Some(rack) = self.rack {
            plc.rack = rack;
        }
        if let Some(slot) = self.slot {
            plc.slot = slot;
        }
        if self.local_tsap.is_some() || self.remote_tsap.is_some() {
            plc.local_tsap = self.local_tsap;
            plc.remote_tsap = self.remote_tsap;
        }
        if let Some(ct) = self.connection_type {
            plc.connection_type = ct;
        }
        if let Some(ms) = self.connect_timeout_ms {
            plc.timeouts.connect_ms = ms;
        }
        if let Some(ms) = self.read_timeout_ms {
            plc.timeouts.read_ms = ms;
        }

        let read = &mut config.read;
        if let Some(db) = self.db {
            read.db = db;
        }
        if let Some(start) = self.start {
            read.start = start;
        }
        if let Some(size) = self.size {
            read.size = size;
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }

        Ok(config)
    }
}

fn execute(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let data = s7read::run(&config)?;
    print!("{}", render(&data, config.output.format));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
