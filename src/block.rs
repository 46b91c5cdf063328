// s7read - Reads a slice of a Siemens S7 Data Block.
// Copyright 2025 - Davide Nardella

use std::fmt;

use crate::error::{Error, Result};
use crate::session::BlockReader;

/// Byte addresses inside a DB are 16 bit
const DB_ADDRESS_SPACE: u32 = 0x1_0000;

/// ### A contiguous slice of a Data Block
///
/// `DB1:0-3` is DB number 1, bytes 0 to 3 included (`size` = 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRange {
    db_number: u16,
    start: u16,
    size: u16,
}

impl DbRange {
    /// ### Validates a DB slice
    ///
    /// ### Errors
    /// - `Error::InvalidRange`: DB 0, size 0 or slice crossing the 64 KB address space.
    ///
    pub fn new(db_number: u16, start: u16, size: u16) -> Result<Self> {
        if db_number == 0 {
            return Err(Error::InvalidRange("DB number must be > 0".to_string()));
        }
        if size == 0 {
            return Err(Error::InvalidRange("size must be > 0".to_string()));
        }
        if start as u32 + size as u32 > DB_ADDRESS_SPACE {
            return Err(Error::InvalidRange(format!(
                "{} byte from offset {} exceed the DB address space",
                size, start
            )));
        }
        Ok(DbRange { db_number, start, size })
    }

    pub fn db_number(&self) -> u16 {
        self.db_number
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    /// Last byte address included in the slice, `size >= 1` holds
    pub fn end(&self) -> u16 {
        self.start + (self.size - 1)
    }

    pub fn len(&self) -> usize {
        self.size as usize
    }
}

impl fmt::Display for DbRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DB{}:{}-{}", self.db_number, self.start, self.end())
    }
}

/// Bytes read from a `DbRange`, always exactly `range.size()` of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockData {
    range: DbRange,
    bytes: Vec<u8>,
}

impl BlockData {
    pub fn new(range: DbRange, bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != range.len() {
            return Err(Error::LengthMismatch {
                expected: range.len(),
                actual: bytes.len(),
            });
        }
        Ok(BlockData { range, bytes })
    }

    pub fn range(&self) -> &DbRange {
        &self.range
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads `range` with a single job on `reader`.
pub fn read_block<R: BlockReader + ?Sized>(reader: &mut R, range: DbRange) -> Result<BlockData> {
    let mut buffer = vec![0u8; range.len()];
    reader.read_db(range, &mut buffer)?;
    BlockData::new(range, buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust7::S7Error;

    /// Serves a fake DB whose byte N holds N (mod 256)
    struct CountingDb {
        calls: Vec<DbRange>,
    }

    impl BlockReader for CountingDb {
        fn read_db(&mut self, range: DbRange, buffer: &mut [u8]) -> Result<()> {
            self.calls.push(range);
            for (i, b) in buffer.iter_mut().enumerate() {
                *b = (range.start() as usize + i) as u8;
            }
            Ok(())
        }
    }

    struct MissingDb;

    impl BlockReader for MissingDb {
        fn read_db(&mut self, range: DbRange, _buffer: &mut [u8]) -> Result<()> {
            Err(Error::Read { range, cause: S7Error::S7NotFound })
        }
    }

    #[test]
    fn range_display_is_inclusive() {
        let r = DbRange::new(1, 0, 4).unwrap();
        assert_eq!(r.to_string(), "DB1:0-3");
        assert_eq!(r.end(), 3);

        let single = DbRange::new(100, 45, 1).unwrap();
        assert_eq!(single.to_string(), "DB100:45-45");
    }

    #[test]
    fn range_limits() {
        assert!(matches!(DbRange::new(0, 0, 4), Err(Error::InvalidRange(_))));
        assert!(matches!(DbRange::new(1, 0, 0), Err(Error::InvalidRange(_))));
        assert!(matches!(DbRange::new(1, 65535, 2), Err(Error::InvalidRange(_))));

        let last = DbRange::new(1, 65535, 1).unwrap();
        assert_eq!(last.end(), 65535);
        let whole = DbRange::new(1, 1, 65535).unwrap();
        assert_eq!(whole.end(), 65535);
    }

    #[test]
    fn accessors_expose_validated_fields() {
        let r = DbRange::new(12, 8, 2).unwrap();
        assert_eq!((r.db_number(), r.start(), r.size()), (12, 8, 2));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn block_data_length_must_match() {
        let r = DbRange::new(1, 0, 4).unwrap();
        assert!(BlockData::new(r, vec![1, 2, 3, 4]).is_ok());
        match BlockData::new(r, vec![1, 2, 3]) {
            Err(Error::LengthMismatch { expected, actual }) => {
                assert_eq!(expected, 4);
                assert_eq!(actual, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn read_block_issues_one_job() {
        let mut db = CountingDb { calls: Vec::new() };
        let r = DbRange::new(7, 10, 4).unwrap();

        let data = read_block(&mut db, r).unwrap();

        assert_eq!(db.calls, vec![r]);
        assert_eq!(data.range(), &r);
        assert_eq!(data.bytes(), &[10, 11, 12, 13]);
    }

    #[test]
    fn read_block_propagates_plc_errors() {
        let r = DbRange::new(99, 0, 4).unwrap();
        let err = read_block(&mut MissingDb, r).unwrap_err();
        assert!(matches!(err, Error::Read { cause: S7Error::S7NotFound, .. }));
        assert!(err.to_string().starts_with("Read of DB99:0-3 failed"));
    }
}
