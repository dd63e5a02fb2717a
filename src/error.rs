//! Error types surfaced at the public entry points.
//!
//! The kernel's internal hot loop keeps the assert-and-abort policy the
//! original design calls for (spec §7): a bound violation inside the
//! per-row or per-`i` loop indicates a logic bug in the kernel itself, not
//! bad caller input, and release builds should stay branch-free there.
//! Everything checkable once, at construction or at the public `spmv`/
//! `advanced_spmv` entry points, is instead a recoverable `Result` so a
//! host embedding this crate isn't forced to abort its whole process over
//! a shape mismatch.

use thiserror::Error;

/// Errors returned by the container constructors and the public SpMV entry points.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EllMulError {
    /// A `Dense`/`Ell` constructor was given buffers whose length doesn't
    /// match the declared shape and stride.
    #[error("{context}: shape mismatch (expected {expected}, got {got})")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// An ELL column index outside `{-1} ∪ [0, cols)` was found while
    /// validating a newly constructed `Ell` matrix.
    #[error(
        "invalid column index {col} at row {row}, slot {slot} (matrix has {num_cols} columns)"
    )]
    InvalidColumnIndex {
        row: usize,
        slot: usize,
        col: i64,
        num_cols: usize,
    },

    /// `A.cols != B.rows` at the `spmv`/`advanced_spmv` entry point.
    #[error("dimension mismatch: A has {a_cols} columns, B has {b_rows} rows")]
    DimensionMismatch { a_cols: usize, b_rows: usize },

    /// `C`'s shape doesn't match `(A.rows, B.cols)`.
    #[error("output shape mismatch: expected {expected:?}, got {got:?}")]
    OutputDimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// `alpha`/`beta` is not a 1x1 matrix.
    #[error("{which} must be a 1x1 matrix")]
    ScalarShapeMismatch { which: &'static str },
}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = std::result::Result<T, EllMulError>;
