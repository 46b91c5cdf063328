// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

//! Run configuration
//!
//! Built from defaults, then an optional TOML file, then command line
//! overrides. Every section and field is optional in the file:
//!
//! ```toml
//! [plc]
//! address = "192.168.0.100:102"
//! rack = 0
//! slot = 1
//! connection_type = "op"
//!
//! [plc.timeouts]
//! connect_ms = 5000
//!
//! [read]
//! db = 100
//! start = 0
//! size = 16
//!
//! [output]
//! format = "hex"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::block::DbRange;
use crate::endpoint::{Addressing, ConnectParams, ConnectionType, Timeouts};
use crate::error::Result;
use crate::format::OutputFormat;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub plc: PlcConfig,
    pub read: ReadConfig,
    pub output: OutputConfig,
}

/// Where and how to connect
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlcConfig {
    /// `host:port`, port 102 when omitted
    pub address: String,
    pub rack: u16,
    pub slot: u16,
    /// Raw TSAPs, both or none. They take precedence over rack/slot
    pub local_tsap: Option<u16>,
    pub remote_tsap: Option<u16>,
    pub connection_type: ConnectionType,
    pub timeouts: Timeouts,
}

impl Default for PlcConfig {
    fn default() -> Self {
        PlcConfig {
            address: "3.124.67.191:13122".to_string(),
            rack: 0,
            slot: 2,
            local_tsap: None,
            remote_tsap: None,
            connection_type: ConnectionType::Pg,
            timeouts: Timeouts::default(),
        }
    }
}

/// Which DB slice to read
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadConfig {
    pub db: u16,
    pub start: u16,
    pub size: u16,
}

impl Default for ReadConfig {
    fn default() -> Self {
        ReadConfig {
            db: 1,
            start: 0,
            size: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Config {
    /// ### Loads a TOML configuration file
    ///
    /// Missing fields keep their defaults.
    ///
    /// ### Errors
    /// - `Error::Io`: the file cannot be read.
    /// - `Error::Config`: the file is not valid TOML or has unknown/mistyped keys.
    ///
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn connect_params(&self) -> Result<ConnectParams> {
        let plc = &self.plc;
        Ok(ConnectParams {
            endpoint: plc.address.parse()?,
            addressing: Addressing::from_parts(plc.rack, plc.slot, plc.local_tsap, plc.remote_tsap)?,
            connection_type: plc.connection_type,
            timeouts: plc.timeouts,
        })
    }

    pub fn db_range(&self) -> Result<DbRange> {
        DbRange::new(self.read.db, self.read.start, self.read.size)
    }
}
