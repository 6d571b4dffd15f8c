use super::DecodedBuffer;
use crate::DomainError;
use h3o::{CellIndex, Resolution};
use std::fmt;

/// Leading hex digit of every address: index mode 1 (cell) with the
/// reserved top bits cleared.
const MODE_DIGIT: char = '8';
/// Fills the unused resolution digits (7 = "no digit") and base-cell bits.
const FILL_DIGIT: char = 'f';
/// H3 renders a cell as 15 hex digits; the top nibble of the u64 is zero.
const ADDRESS_DIGITS: usize = 15;

/// A decoded identifier interpreted as an H3 cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    cell: CellIndex,
}

/// Ancestry of a cell, finest level first, ending with its base cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments {
    child_positions: Vec<u8>,
    base_cell: u8,
}

impl CellAddress {
    /// `8` followed by the buffer's hex digits, cut or `f`-filled to the
    /// fixed address width.
    pub fn address_text(buffer: &DecodedBuffer) -> String {
        let mut text = String::with_capacity(ADDRESS_DIGITS);
        text.push(MODE_DIGIT);
        text.extend(
            buffer
                .to_hex()
                .chars()
                .chain(std::iter::repeat(FILL_DIGIT))
                .take(ADDRESS_DIGITS - 1),
        );
        text
    }

    pub fn from_decoded(buffer: &DecodedBuffer) -> Result<Self, DomainError> {
        Self::from_hex(&Self::address_text(buffer))
    }

    pub fn from_hex(text: &str) -> Result<Self, DomainError> {
        let raw = u64::from_str_radix(text, 16)
            .map_err(|e| DomainError::InvalidCell(format!("'{}': {}", text, e)))?;
        let cell = CellIndex::try_from(raw)
            .map_err(|e| DomainError::InvalidCell(format!("'{}': {}", text, e)))?;
        Ok(Self { cell })
    }

    pub fn resolution(&self) -> u8 {
        u8::from(self.cell.resolution())
    }

    pub fn base_cell(&self) -> u8 {
        u8::from(self.cell.base_cell())
    }

    /// Walks from the cell's own resolution up to resolution 1, recording
    /// each ancestor's position among its parent's children.
    pub fn path_segments(&self) -> Result<PathSegments, DomainError> {
        let resolution = self.resolution();
        let mut child_positions = Vec::with_capacity(usize::from(resolution));

        for level in (1..=resolution).rev() {
            let ancestor = if level == resolution {
                self.cell
            } else {
                self.cell
                    .parent(to_resolution(level)?)
                    .ok_or_else(|| self.walk_error(level))?
            };
            let position = ancestor
                .child_position(to_resolution(level - 1)?)
                .ok_or_else(|| self.walk_error(level))?;
            let position = u8::try_from(position).map_err(|_| self.walk_error(level))?;
            child_positions.push(position);
        }

        Ok(PathSegments {
            child_positions,
            base_cell: self.base_cell(),
        })
    }

    fn walk_error(&self, level: u8) -> DomainError {
        DomainError::InvalidCell(format!("{}: no ancestry at resolution {}", self.cell, level))
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cell)
    }
}

fn to_resolution(level: u8) -> Result<Resolution, DomainError> {
    Resolution::try_from(level)
        .map_err(|e| DomainError::InvalidCell(format!("resolution {}: {}", level, e)))
}

impl PathSegments {
    pub fn child_positions(&self) -> &[u8] {
        &self.child_positions
    }

    pub fn base_cell(&self) -> u8 {
        self.base_cell
    }

    /// Number of segments including the base cell.
    pub fn len(&self) -> usize {
        self.child_positions.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Segments as they appear in DNS label order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.child_positions
            .iter()
            .copied()
            .chain(std::iter::once(self.base_cell))
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in &self.child_positions {
            write!(f, "{}.", position)?;
        }
        write!(f, "{}", self.base_cell)
    }
}
