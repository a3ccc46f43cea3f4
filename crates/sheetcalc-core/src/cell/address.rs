//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Column letters use the spreadsheet numbering with no zero digit
/// (A=0, Z=25, AA=26) and rows are 1-based in text, 0-based here.
/// `$` markers are accepted on input and discarded: they carry no meaning
/// in this engine, so `$A$1` and `A1` are the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
}

impl CellAddress {
    /// Create a new cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use sheetcalc_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("A1").unwrap();
    /// assert_eq!(addr.row, 0);
    /// assert_eq!(addr.col, 0);
    ///
    /// let addr = CellAddress::parse("$AA$10").unwrap();
    /// assert_eq!(addr.row, 9);
    /// assert_eq!(addr.col, 26);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }

        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[col_start..pos])?;

        if bytes.get(pos) == Some(&b'$') {
            pos += 1;
        }

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        let row = row - 1;

        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1;

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Convert column letters to index (A = 0, Z = 25, AA = 26, etc.)
    ///
    /// Each letter is a digit 1..=26, so the accumulated value is one past
    /// the column index and the final step subtracts one.
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            let digit = c.to_ascii_uppercase() as u64 - 'A' as u64 + 1;
            col = col.saturating_mul(26).saturating_add(digit);
        }

        if col > MAX_COLS as u64 {
            let index = u32::try_from(col - 1).unwrap_or(u32::MAX);
            return Err(Error::ColumnOutOfBounds(index, MAX_COLS - 1));
        }

        Ok((col - 1) as u16)
    }

    /// The canonical id: uppercase letters, 1-based row, no `$`
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left)
    pub start: CellAddress,
    /// End address (bottom-right)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new cell range
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        // Normalize so start is top-left and end is bottom-right
        Self {
            start: CellAddress::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellAddress::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        match s.split_once(':') {
            Some((start, end)) => {
                if end.contains(':') {
                    return Err(Error::InvalidRange(s.to_string()));
                }
                let start = CellAddress::parse(start)?;
                let end = CellAddress::parse(end)?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(CellAddress::parse(s)?)),
        }
    }

    /// Whether `addr` lies inside the range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Cells a reference to this range expands to
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Iterate over all cell addresses in the range, column by column.
    ///
    /// The outer loop walks columns left to right and the inner loop walks
    /// rows top to bottom. Functions that turn ranges into arrays rely on
    /// this order.
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col as u32,
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Column-major iterator over cells in a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    // Widened so stepping past the last column cannot overflow at XFD.
    current_col: u32,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_col > self.range.end.col as u32 {
            return None;
        }

        let addr = CellAddress::new(self.current_row, self.current_col as u16);

        if self.current_row >= self.range.end.row {
            self.current_row = self.range.start.row;
            self.current_col += 1;
        } else {
            self.current_row += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current_col > self.range.end.col as u32 {
            return (0, Some(0));
        }
        let rows = self.range.row_count() as u64;
        let full_cols = (self.range.end.col as u32 - self.current_col) as u64;
        let in_col = (self.range.end.row - self.current_row + 1) as u64;
        let remaining = (full_cols * rows + in_col) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}

/// Walk the range spanned by two corner ids, pairing every id with a value.
///
/// Corners may be given in any order; the walk is always column-major over
/// the normalized rectangle.
pub fn iterate_range<V, F>(start: &str, end: &str, mut lookup: F) -> Result<Vec<(String, V)>>
where
    F: FnMut(CellAddress) -> V,
{
    let range = CellRange::new(CellAddress::parse(start)?, CellAddress::parse(end)?);
    Ok(range
        .cells()
        .map(|addr| (addr.to_string(), lookup(addr)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(CellAddress::column_to_letters(0), "A");
        assert_eq!(CellAddress::column_to_letters(1), "B");
        assert_eq!(CellAddress::column_to_letters(25), "Z");
        assert_eq!(CellAddress::column_to_letters(26), "AA");
        assert_eq!(CellAddress::column_to_letters(27), "AB");
        assert_eq!(CellAddress::column_to_letters(701), "ZZ");
        assert_eq!(CellAddress::column_to_letters(702), "AAA");
        assert_eq!(CellAddress::column_to_letters(16383), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(CellAddress::letters_to_column("A").unwrap(), 0);
        assert_eq!(CellAddress::letters_to_column("Z").unwrap(), 25);
        assert_eq!(CellAddress::letters_to_column("AA").unwrap(), 26);
        assert_eq!(CellAddress::letters_to_column("AZ").unwrap(), 51);
        assert_eq!(CellAddress::letters_to_column("BA").unwrap(), 52);
        assert_eq!(CellAddress::letters_to_column("ZZ").unwrap(), 701);
        assert_eq!(CellAddress::letters_to_column("XFD").unwrap(), 16383);

        // Case insensitive
        assert_eq!(CellAddress::letters_to_column("aa").unwrap(), 26);
    }

    #[test]
    fn test_cell_address_parse() {
        let addr = CellAddress::parse("A1").unwrap();
        assert_eq!(addr, CellAddress::new(0, 0));

        let addr = CellAddress::parse("C10").unwrap();
        assert_eq!(addr, CellAddress::new(9, 2));

        // Absolute markers are stripped
        assert_eq!(CellAddress::parse("$A$1").unwrap(), CellAddress::new(0, 0));
        assert_eq!(CellAddress::parse("$B2").unwrap(), CellAddress::new(1, 1));
        assert_eq!(CellAddress::parse("B$2").unwrap(), CellAddress::new(1, 1));

        assert_eq!(
            CellAddress::parse("XFD1048576").unwrap(),
            CellAddress::new(1_048_575, 16_383)
        );
    }

    #[test]
    fn test_cell_address_parse_errors() {
        assert!(CellAddress::parse("").is_err());
        assert!(CellAddress::parse("A").is_err());
        assert!(CellAddress::parse("1").is_err());
        assert!(CellAddress::parse("A0").is_err());
        assert!(CellAddress::parse("A1B").is_err());
        assert!(CellAddress::parse("A-1").is_err());
        assert!(matches!(
            CellAddress::parse("A1048577"),
            Err(Error::RowOutOfBounds(..))
        ));
        assert_eq!(
            CellAddress::parse("XFE1"),
            Err(Error::ColumnOutOfBounds(16_384, 16_383))
        );
        assert_eq!(
            CellAddress::letters_to_column("ZZZZ"),
            Err(Error::ColumnOutOfBounds(475_253, 16_383))
        );
        assert!(CellAddress::parse(&format!("{}1", "Z".repeat(40))).is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(0, 0).to_string(), "A1");
        assert_eq!(CellAddress::new(99, 2).to_string(), "C100");
        assert_eq!(CellAddress::parse("$ab$7").unwrap().to_string(), "AB7");
    }

    #[test]
    fn test_cell_range_parse_normalizes() {
        let range = CellRange::parse("B2:A1").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(1, 1));

        let range = CellRange::parse("A3:C1").unwrap();
        assert_eq!(range.start, CellAddress::new(0, 0));
        assert_eq!(range.end, CellAddress::new(2, 2));

        let range = CellRange::parse("C3").unwrap();
        assert_eq!(range.start, range.end);

        assert!(CellRange::parse("A1:B2:C3").is_err());
    }

    #[test]
    fn test_cell_range_contains() {
        let range = CellRange::parse("B2:D4").unwrap();

        assert!(range.contains(&CellAddress::new(1, 1)));
        assert!(range.contains(&CellAddress::new(3, 3)));
        assert!(!range.contains(&CellAddress::new(0, 0)));
        assert!(!range.contains(&CellAddress::new(4, 1)));
    }

    #[test]
    fn test_cell_range_iterator_is_column_major() {
        let range = CellRange::parse("A1:B3").unwrap();
        let cells: Vec<String> = range.cells().map(|a| a.to_string()).collect();

        assert_eq!(cells, ["A1", "A2", "A3", "B1", "B2", "B3"]);
        assert_eq!(range.cells().len(), 6);
    }

    #[test]
    fn test_cell_range_iterator_last_column() {
        let range = CellRange::parse("XFC1:XFD2").unwrap();
        let cells: Vec<String> = range.cells().map(|a| a.to_string()).collect();
        assert_eq!(cells, ["XFC1", "XFC2", "XFD1", "XFD2"]);
    }

    #[test]
    fn test_iterate_range_pairs_values() {
        let pairs = iterate_range("B2", "A1", |addr| addr.row * 10 + addr.col as u32).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("A1".to_string(), 0),
                ("A2".to_string(), 10),
                ("B1".to_string(), 1),
                ("B2".to_string(), 11),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_address_round_trip(row in 0u32..MAX_ROWS, col in 0u16..MAX_COLS) {
            let addr = CellAddress::new(row, col);
            prop_assert_eq!(CellAddress::parse(&addr.to_string()).unwrap(), addr);
        }

        #[test]
        fn prop_range_order_ignores_corner_order(
            r1 in 0u32..40, c1 in 0u16..40, r2 in 0u32..40, c2 in 0u16..40,
        ) {
            let a = CellAddress::new(r1, c1).to_string();
            let b = CellAddress::new(r2, c2).to_string();
            let forward = iterate_range(&a, &b, |addr| addr).unwrap();
            let backward = iterate_range(&b, &a, |addr| addr).unwrap();
            prop_assert_eq!(&forward, &backward);

            let count = (r1.abs_diff(r2) as usize + 1) * (c1.abs_diff(c2) as usize + 1);
            prop_assert_eq!(forward.len(), count);
        }
    }
}
