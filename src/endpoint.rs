// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// ISO-on-TCP (RFC 1006) port
pub const ISO_TCP_PORT: u16 = 102;

/// Local TSAP used for rack/slot connections
pub const LOCAL_TSAP: u16 = 0x0100;

const MAX_RACK: u16 = 7;
const MAX_SLOT: u16 = 31;

/// ### TCP endpoint of the PLC
///
/// Accepts `host:port`, a bare `host` (port 102) or a bracketed IPv6
/// literal (`[::1]:102`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Endpoint { host: host.into(), port }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || Error::InvalidEndpoint(s.to_string());

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            // [v6]:port or [v6]
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            match tail {
                "" => (host, None),
                _ => (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?)),
            }
        } else {
            match s.rsplit_once(':') {
                // A bare v6 literal has more than one colon
                Some((host, _)) if host.contains(':') => return Err(invalid()),
                Some((host, port)) => (host, Some(port)),
                None => (s, None),
            }
        };

        if host.is_empty() {
            return Err(invalid());
        }

        let port = match port {
            Some(p) => p.parse::<u16>().map_err(|_| invalid())?,
            None => ISO_TCP_PORT,
        };
        if port == 0 {
            return Err(invalid());
        }

        Ok(Endpoint::new(host, port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// S7 connection type, carried in the high byte of the remote TSAP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// As programming device
    #[default]
    Pg,
    /// As HMI
    Op,
    /// As generic device
    #[serde(alias = "s7", alias = "basic")]
    S7Basic,
}

impl ConnectionType {
    pub fn code(self) -> u16 {
        match self {
            ConnectionType::Pg => rust7::CT_PG,
            ConnectionType::Op => rust7::CT_OP,
            ConnectionType::S7Basic => rust7::CT_S7,
        }
    }
}

impl FromStr for ConnectionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pg" => Ok(ConnectionType::Pg),
            "op" => Ok(ConnectionType::Op),
            "s7" | "s7basic" | "basic" => Ok(ConnectionType::S7Basic),
            other => Err(Error::Config(format!("unknown connection type '{}'", other))),
        }
    }
}

/// ### The two endpoint identifiers of an S7 session
///
/// S7300/1200/1500 are normally addressed by rack and slot, LOGO! and S7200
/// need the raw TSAP pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    RackSlot { rack: u16, slot: u16 },
    Tsap { local: u16, remote: u16 },
}

impl Addressing {
    pub fn rack_slot(rack: u16, slot: u16) -> Result<Self> {
        if rack > MAX_RACK {
            return Err(Error::Config(format!("rack {} out of range (0..={})", rack, MAX_RACK)));
        }
        if slot > MAX_SLOT {
            return Err(Error::Config(format!("slot {} out of range (0..={})", slot, MAX_SLOT)));
        }
        Ok(Addressing::RackSlot { rack, slot })
    }

    /// Both TSAPs win over rack/slot, a lone TSAP is an error.
    pub fn from_parts(
        rack: u16,
        slot: u16,
        local_tsap: Option<u16>,
        remote_tsap: Option<u16>,
    ) -> Result<Self> {
        match (local_tsap, remote_tsap) {
            (Some(local), Some(remote)) => Ok(Addressing::Tsap { local, remote }),
            (None, None) => Addressing::rack_slot(rack, slot),
            _ => Err(Error::Config(
                "local and remote TSAP must be given together".to_string(),
            )),
        }
    }

    pub fn local_tsap(&self) -> u16 {
        match *self {
            Addressing::RackSlot { .. } => LOCAL_TSAP,
            Addressing::Tsap { local, .. } => local,
        }
    }

    pub fn remote_tsap(&self, conn_type: ConnectionType) -> u16 {
        match *self {
            Addressing::RackSlot { rack, slot } => (conn_type.code() << 8) + rack * 0x20 + slot,
            Addressing::Tsap { remote, .. } => remote,
        }
    }
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addressing::RackSlot { rack, slot } => write!(f, "rack {} slot {}", rack, slot),
            Addressing::Tsap { local, remote } => {
                write!(f, "TSAP {:04X}/{:04X}", local, remote)
            }
        }
    }
}

/// Parses a TSAP: `0x0102`, `0102` (hex, leading zero) or `258` (decimal).
pub fn parse_tsap(s: &str) -> Result<u16> {
    let s = s.trim();
    let invalid = |_| Error::Config(format!("invalid TSAP '{}'", s));

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).map_err(invalid)
    } else if s.len() == 4 && s.starts_with('0') {
        u16::from_str_radix(s, 16).map_err(invalid)
    } else {
        s.parse::<u16>().map_err(invalid)
    }
}

/// TCP, Read and Write timeouts in ms, 0 keeps the client default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    pub connect_ms: u64,
    pub read_ms: u64,
    pub write_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            connect_ms: 3000,
            read_ms: 1000,
            write_ms: 500,
        }
    }
}

/// Everything needed to open a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub endpoint: Endpoint,
    pub addressing: Addressing,
    pub connection_type: ConnectionType,
    pub timeouts: Timeouts,
}
