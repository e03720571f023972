//! Flush range arguments and sentinel values.

use crate::ParseError;
use std::fmt;

/// Raw count sentinel: flush every entry of the table.
pub const ALL_ENTRIES: i32 = -1000;

/// Raw count sentinel: flush every entry of one bank.
pub const ALL_BANK_ENTRIES: i32 = -1001;

/// Raw result of the find selector when no identical entry exists.
pub const NOT_FOUND: u32 = 0xffff_ffff;

/// Range of cached rows handed to a flush callback.
///
/// The resolved `(start, count)` pair is computed against the table's probed
/// dimensions by the backend; nothing here is validated until then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlushRange {
    /// Every row of the table.
    All,
    /// Every row of one bank of a banked table.
    AllBank { bank: u32 },
    /// `count` records of one bank, starting at `record`.
    Records { bank: u32, record: u32, count: u32 },
    /// `count` rows starting at `start`.
    Range { start: u32, count: u32 },
}

impl FlushRange {
    /// Creates a plain row range.
    pub const fn range(start: u32, count: u32) -> Self {
        FlushRange::Range { start, count }
    }

    /// Creates a range covering a single row.
    pub const fn single(index: u32) -> Self {
        FlushRange::Range {
            start: index,
            count: 1,
        }
    }

    /// Decodes the legacy `(start, count)` argument pair.
    ///
    /// A count of [`ALL_ENTRIES`] selects the whole table, and a count of
    /// [`ALL_BANK_ENTRIES`] selects the whole bank numbered `start`. Any
    /// other negative count is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use flow_hw_types::{FlushRange, ALL_BANK_ENTRIES, ALL_ENTRIES};
    ///
    /// assert_eq!(FlushRange::from_raw(0, ALL_ENTRIES).unwrap(), FlushRange::All);
    /// assert_eq!(
    ///     FlushRange::from_raw(2, ALL_BANK_ENTRIES).unwrap(),
    ///     FlushRange::AllBank { bank: 2 }
    /// );
    /// assert_eq!(FlushRange::from_raw(4, 3).unwrap(), FlushRange::range(4, 3));
    /// ```
    pub fn from_raw(start: u32, count: i32) -> Result<Self, ParseError> {
        match count {
            ALL_ENTRIES => Ok(FlushRange::All),
            ALL_BANK_ENTRIES => Ok(FlushRange::AllBank { bank: start }),
            n if n < 0 => Err(ParseError::InvalidFlushCount(n)),
            n => Ok(FlushRange::Range {
                start,
                count: n as u32,
            }),
        }
    }
}

impl fmt::Display for FlushRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlushRange::All => write!(f, "all entries"),
            FlushRange::AllBank { bank } => write!(f, "bank {}", bank),
            FlushRange::Records {
                bank,
                record,
                count,
            } => write!(f, "bank {} records [{}, +{})", bank, record, count),
            FlushRange::Range { start, count } => write!(f, "[{}, +{})", start, count),
        }
    }
}
