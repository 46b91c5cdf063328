// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use log::{debug, info};
use rust7::S7Client;

use crate::block::DbRange;
use crate::endpoint::{Addressing, ConnectParams, Endpoint};
use crate::error::{Error, Result};

/// Something able to fill a buffer from a Data Block
pub trait BlockReader {
    /// ### Reads `range` into `buffer`
    ///
    /// `buffer.len()` must be equal to `range.size()`.
    fn read_db(&mut self, range: DbRange, buffer: &mut [u8]) -> Result<()>;
}

/// ### A connected S7 client
///
/// The connection is opened by `open()` and closed when the session is
/// dropped, whatever the exit path.
pub struct PlcSession {
    client: S7Client,
    endpoint: Endpoint,
}

impl PlcSession {
    /// ### Connects to the PLC
    ///
    /// Connection type, timeouts and TCP port are applied before connecting,
    /// then the ISO handshake and the PDU negotiation are performed by the client.
    ///
    /// ### Errors
    /// - `Error::Connect`: TCP connection, ISO connection or PDU negotiation failed.
    ///
    pub fn open(params: &ConnectParams) -> Result<Self> {
        let endpoint = params.endpoint.clone();
        let mut client = S7Client::new();

        client.set_connection_type(params.connection_type.code());
        client.set_timeout(
            params.timeouts.connect_ms,
            params.timeouts.read_ms,
            params.timeouts.write_ms,
        );
        client.set_connection_port(endpoint.port);

        info!(
            target: "tcp",
            "Connecting to {} ({}, local TSAP {:04X}, remote TSAP {:04X})",
            endpoint,
            params.addressing,
            params.addressing.local_tsap(),
            params.addressing.remote_tsap(params.connection_type)
        );

        let outcome = match params.addressing {
            Addressing::RackSlot { rack, slot } => client.connect_rack_slot(&endpoint.host, rack, slot),
            Addressing::Tsap { local, remote } => client.connect_tsap(&endpoint.host, local, remote),
        };

        if let Err(cause) = outcome {
            return Err(Error::Connect {
                endpoint: endpoint.to_string(),
                cause,
            });
        }

        info!(
            target: "tcp",
            "Connected to {}, PDU negotiated: {} byte, job time: {:.3} ms",
            endpoint, client.pdu_length, client.last_time
        );

        Ok(PlcSession { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// PDU length negotiated by the CPU
    pub fn pdu_length(&self) -> u16 {
        self.client.pdu_length
    }
}

impl BlockReader for PlcSession {
    fn read_db(&mut self, range: DbRange, buffer: &mut [u8]) -> Result<()> {
        if buffer.len() != range.len() {
            return Err(Error::LengthMismatch {
                expected: range.len(),
                actual: buffer.len(),
            });
        }

        self.client
            .read_db(range.db_number(), range.start(), buffer)
            .map_err(|cause| Error::Read { range, cause })?;

        debug!(
            target: "tcp",
            "Read {} in {} chunk(s), job time: {:.3} ms",
            range, self.client.chunks, self.client.last_time
        );
        Ok(())
    }
}

impl Drop for PlcSession {
    fn drop(&mut self) {
        if self.client.connected {
            self.client.disconnect();
            debug!(target: "tcp", "Disconnected from {}", self.endpoint);
        }
    }
}
