// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use log::info;

use crate::block::{read_block, BlockData};
use crate::config::Config;
use crate::error::Result;
use crate::session::PlcSession;

/// ### Connects, reads the configured DB slice and disconnects
///
/// Endpoint, addressing and range are validated before touching the network.
/// The session is closed before returning, on success and on error.
///
/// ### Errors
/// The first error met, see `Error`.
///
pub fn run(config: &Config) -> Result<BlockData> {
    let params = config.connect_params()?;
    let range = config.db_range()?;

    let mut session = PlcSession::open(&params)?;
    let data = read_block(&mut session, range)?;

    info!("Read {} from {}", range, session.endpoint());
    Ok(data)
}
