#![doc = include_str!("../README.md")]

pub mod block;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod job;
pub mod session;

pub use block::{read_block, BlockData, DbRange};
pub use config::Config;
pub use endpoint::{Addressing, ConnectParams, ConnectionType, Endpoint, Timeouts};
pub use error::{Error, Result};
pub use format::{render, OutputFormat};
pub use job::run;
pub use session::{BlockReader, PlcSession};
