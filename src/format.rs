// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use std::str::FromStr;

use serde::Deserialize;

use crate::block::BlockData;
use crate::error::Error;

const HEX_ROW: usize = 16;

/// How a block is printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `DB1:0-3 = [1 2 3 4]`
    #[default]
    Plain,
    /// Header line plus a 16 byte per row hex dump
    Hex,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "hex" => Ok(OutputFormat::Hex),
            other => Err(Error::Config(format!("unknown output format '{}'", other))),
        }
    }
}

/// Renders `data`, always newline terminated.
pub fn render(data: &BlockData, format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => render_plain(data),
        OutputFormat::Hex => render_hex(data),
    }
}

fn render_plain(data: &BlockData) -> String {
    let values: Vec<String> = data.bytes().iter().map(|b| b.to_string()).collect();
    format!("{} = [{}]\n", data.range(), values.join(" "))
}

fn render_hex(data: &BlockData) -> String {
    let range = data.range();
    let mut out = format!("{} ({} byte)\n", range, range.len());

    for (i, chunk) in data.bytes().chunks(HEX_ROW).enumerate() {
        // Offsets are absolute DB addresses
        let offset = range.start() as usize + i * HEX_ROW;
        let row: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
        out.push_str(&format!("{:04X}: {}\n", offset, row.join(" ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::DbRange;

    fn block(db: u16, start: u16, bytes: Vec<u8>) -> BlockData {
        let range = DbRange::new(db, start, bytes.len() as u16).unwrap();
        BlockData::new(range, bytes).unwrap()
    }

    #[test]
    fn plain_matches_classic_output() {
        let data = block(1, 0, vec![1, 2, 3, 4]);
        assert_eq!(render(&data, OutputFormat::Plain), "DB1:0-3 = [1 2 3 4]\n");

        let data = block(12, 8, vec![0, 255]);
        assert_eq!(render(&data, OutputFormat::Plain), "DB12:8-9 = [0 255]\n");
    }

    #[test]
    fn hex_rows_use_absolute_offsets() {
        let data = block(100, 0x20, (0u8..20).collect());
        let text = render(&data, OutputFormat::Hex);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "DB100:32-51 (20 byte)");
        assert_eq!(
            lines[1],
            "0020: 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F"
        );
        assert_eq!(lines[2], "0030: 10 11 12 13");
    }

    #[test]
    fn format_names() {
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("HEX".parse::<OutputFormat>().unwrap(), OutputFormat::Hex);
        assert!("json".parse::<OutputFormat>().is_err());
    }
}
