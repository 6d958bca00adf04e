#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure codec between a sparse terrain cell set and its flat text form.
//!
//! The wire format is the simplest possible rectangular integer matrix: one
//! comma-joined line of heights per row, each line newline-terminated, no
//! header and no escaping. Dimensions are recoverable only by counting rows
//! and columns. The format is preserved exactly for compatibility with
//! previously saved terrain files.

use std::collections::HashMap;
use std::num::ParseIntError;

use thiserror::Error;
use trackyard_core::TerrainCell;

/// Errors raised while decoding a terrain grid from text.
#[derive(Debug, Error)]
pub enum TerrainCodecError {
    /// A height token failed to parse as an integer.
    #[error("invalid height at row {row}, column {column}")]
    InvalidHeight {
        /// Zero-based row of the offending token.
        row: u32,
        /// Zero-based column of the offending token.
        column: u32,
        /// Parse failure reported for the token.
        #[source]
        source: ParseIntError,
    },
}

impl TerrainCodecError {
    /// Coordinate of the token that failed to parse.
    #[must_use]
    pub const fn coordinate(&self) -> (u32, u32) {
        match self {
            Self::InvalidHeight { row, column, .. } => (*row, *column),
        }
    }
}

/// Serializes a terrain cell set into its dense rectangular text form.
///
/// An empty cell set yields the empty string. Otherwise the output covers
/// every coordinate in `[0, max_row] × [0, max_column]`; coordinates without
/// a cell default to height `0`. When the input contains several cells at the
/// same coordinate the first occurrence wins; callers must not rely on which
/// duplicate is kept.
#[must_use]
pub fn encode_terrain(cells: &[TerrainCell]) -> String {
    let Some(first) = cells.first() else {
        return String::new();
    };

    let mut max_row = first.row();
    let mut max_column = first.column();
    let mut heights: HashMap<(u32, u32), i32> = HashMap::with_capacity(cells.len());

    for cell in cells {
        max_row = max_row.max(cell.row());
        max_column = max_column.max(cell.column());
        let _ = heights
            .entry((cell.row(), cell.column()))
            .or_insert_with(|| cell.height());
    }

    let mut out = String::new();
    for row in 0..=max_row {
        for column in 0..=max_column {
            if column > 0 {
                out.push(',');
            }
            let height = heights.get(&(row, column)).copied().unwrap_or(0);
            out.push_str(&height.to_string());
        }
        out.push('\n');
    }
    out
}

/// Deserializes a terrain grid from its text form.
///
/// The trailing newline written by [`encode_terrain`] acts as a row
/// terminator, so both `""` and `"\n"` decode to the empty grid and the last
/// data row is never dropped. Any token that fails to parse as an integer
/// aborts the whole decode; a partial grid is never returned, which lets
/// callers treat the entire file as unusable rather than loading stale or
/// truncated terrain.
pub fn decode_terrain(text: &str) -> Result<Vec<TerrainCell>, TerrainCodecError> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut cells = Vec::new();

    for (row, line) in body.split('\n').enumerate() {
        let row = row as u32;
        for (column, token) in line.split(',').enumerate() {
            let column = column as u32;
            let height =
                token
                    .parse::<i32>()
                    .map_err(|source| TerrainCodecError::InvalidHeight {
                        row,
                        column,
                        source,
                    })?;
            cells.push(TerrainCell::new(row, column, height));
        }
    }

    Ok(cells)
}
