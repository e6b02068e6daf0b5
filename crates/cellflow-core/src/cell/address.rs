//! Cell reference and range types

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A reference to a single grid position (e.g., "A1", "AB7")
///
/// Rows are 0-based. Columns are 1-based: column 0 is the grid's row-header
/// column and never holds data, so `A` is column 1, `Z` is 26, `AA` is 27.
///
/// The identifier is bijective base-26 column letters followed by the 1-based
/// row number, so row 0 / column 1 is `A1` and row 6 / column 28 is `AB7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellReference {
    row: u32,
    column: u32,
}

impl CellReference {
    /// Create a reference from a 0-based row and a 1-based column
    ///
    /// # Examples
    /// ```
    /// use cellflow_core::CellReference;
    ///
    /// let reference = CellReference::new(6, 28).unwrap();
    /// assert_eq!(reference.identifier(), "AB7");
    ///
    /// assert!(CellReference::new(0, 0).is_err());
    /// ```
    pub fn new(row: u32, column: u32) -> Result<Self> {
        if column == 0 {
            return Err(Error::InvalidReference(format!(
                "wrong cell coordinates: {}, {}",
                row, column
            )));
        }
        if row == u32::MAX {
            return Err(Error::InvalidReference(format!(
                "row {} is out of bounds",
                row
            )));
        }
        Ok(Self { row, column })
    }

    /// Create a reference from signed coordinates, rejecting negative values
    pub fn from_coords(row: i64, column: i64) -> Result<Self> {
        let (Ok(r), Ok(c)) = (u32::try_from(row), u32::try_from(column)) else {
            return Err(Error::InvalidReference(format!(
                "wrong cell coordinates: {}, {}",
                row, column
            )));
        };
        Self::new(r, c)
    }

    /// Parse a reference from its identifier (e.g., "A1", "p12")
    ///
    /// Column letters are case-insensitive. The identifier must be one or more
    /// letters followed by one or more digits, with a non-zero row.
    ///
    /// # Examples
    /// ```
    /// use cellflow_core::CellReference;
    ///
    /// let reference = CellReference::parse("P12").unwrap();
    /// assert_eq!(reference.row(), 11);
    /// assert_eq!(reference.column(), 16);
    ///
    /// assert!(CellReference::parse("A-1").is_err());
    /// assert!(CellReference::parse("").is_err());
    /// ```
    pub fn parse(identifier: &str) -> Result<Self> {
        if identifier.is_empty() {
            return Err(Error::InvalidReference(
                "cell identifier cannot be empty".into(),
            ));
        }

        let invalid =
            || Error::InvalidReference(format!("invalid cell identifier: {}", identifier));

        let split = identifier
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(identifier.len());
        let (letters, digits) = identifier.split_at(split);

        if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let column = Self::letters_to_column(letters)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }

        Self::new(row - 1, column)
    }

    /// 0-based row index
    pub fn row(&self) -> u32 {
        self.row
    }

    /// 1-based column index
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Canonical identifier (e.g., "AB7")
    pub fn identifier(&self) -> String {
        format!("{}{}", Self::column_to_letters(self.column), self.row + 1)
    }

    /// Convert a 1-based column index to letters (1 = A, 26 = Z, 27 = AA)
    pub fn column_to_letters(column: u32) -> String {
        let mut letters = Vec::new();
        let mut n = column;

        while n > 0 {
            n -= 1;
            letters.push((b'A' + (n % 26) as u8) as char);
            n /= 26;
        }

        letters.iter().rev().collect()
    }

    /// Convert column letters to a 1-based index (A = 1, Z = 26, AA = 27)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidReference("empty column letters".into()));
        }

        letters.chars().try_fold(0u32, |acc, c| {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidReference(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            acc.checked_mul(26)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| Error::InvalidReference(format!("column too large: {}", letters)))
        })
    }
}

impl fmt::Display for CellReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_to_letters(self.column), self.row + 1)
    }
}

impl FromStr for CellReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellReference {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.identifier())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellReference {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let identifier = String::deserialize(deserializer)?;
        Self::parse(&identifier).map_err(serde::de::Error::custom)
    }
}

/// An inclusive rectangular range of cells (e.g., "A1:B2")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left cell
    pub from: CellReference,
    /// Bottom-right cell
    pub to: CellReference,
}

impl CellRange {
    /// Create a range, rejecting single-cell and reversed spans
    pub fn new(from: CellReference, to: CellReference) -> Result<Self> {
        if from == to || from.row > to.row || from.column > to.column {
            return Err(Error::InvalidRange(format!(
                "could not construct range {}:{}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Parse a range from "A1:B2" notation
    pub fn parse(s: &str) -> Result<Self> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidRange(format!("missing ':' in '{}'", s)))?;
        Self::new(CellReference::parse(from)?, CellReference::parse(to)?)
    }

    /// Number of rows spanned
    pub fn row_count(&self) -> u32 {
        self.to.row - self.from.row + 1
    }

    /// Number of columns spanned
    pub fn column_count(&self) -> u32 {
        self.to.column - self.from.column + 1
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.row_count() as usize * self.column_count() as usize
    }

    /// Ranges always hold at least two cells
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the range is a single row
    pub fn is_row(&self) -> bool {
        self.from.row == self.to.row
    }

    /// Whether the range is a single column
    pub fn is_column(&self) -> bool {
        self.from.column == self.to.column
    }

    /// Check if a cell lies inside the range
    pub fn contains(&self, reference: &CellReference) -> bool {
        (self.from.row..=self.to.row).contains(&reference.row)
            && (self.from.column..=self.to.column).contains(&reference.column)
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellReference> + '_ {
        (self.from.row..=self.to.row).flat_map(move |row| {
            (self.from.column..=self.to.column).map(move |column| CellReference { row, column })
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}
