//! ELL (ELLPACK) sparse matrix storage.
//!
//! `A` is stored as two length-`stride * max_nnz_per_row` arrays: `values`
//! and `col_idxs`. The `i`-th non-zero of row `r` lives at offset
//! `r + i * stride`. A column index equal to `IT::INVALID` marks a padding
//! slot; its paired value is never read by the kernel.

use crate::dense::DenseLike;
use crate::error::{EllMulError, Result};
use crate::scalar::Scalar;
use num_traits::Zero;

/// Sealed trait for the two column-index widths the kernel supports.
///
/// `INVALID` is the sentinel marking a padding slot. The 32-bit case is
/// additionally the type the AVX-512 fast path gathers with; 64-bit index
/// builds never take that path (spec §6).
pub trait IndexType: Copy + Default + Send + Sync + PartialEq + Eq + 'static {
    const INVALID: Self;
    const IS_32_BIT: bool;

    /// Widens to `i64` for error messages and bounds comparisons.
    fn to_i64(self) -> i64;
    fn from_usize(v: usize) -> Self;
}

impl IndexType for i32 {
    const INVALID: Self = -1;
    const IS_32_BIT: bool = true;

    #[inline(always)]
    fn to_i64(self) -> i64 {
        self as i64
    }

    #[inline(always)]
    fn from_usize(v: usize) -> Self {
        v as i32
    }
}

impl IndexType for i64 {
    const INVALID: Self = -1;
    const IS_32_BIT: bool = false;

    #[inline(always)]
    fn to_i64(self) -> i64 {
        self
    }

    #[inline(always)]
    fn from_usize(v: usize) -> Self {
        v as i64
    }
}

/// The container interface the kernel consumes from an ELL matrix (spec §6).
pub trait EllLike<MV: Scalar, IT: IndexType> {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn num_stored_elements_per_row(&self) -> usize;
    fn stride(&self) -> usize;
    fn const_values_ptr(&self) -> *const MV;
    fn const_col_idxs_ptr(&self) -> *const IT;
    /// Equivalent to `col_idxs[row + i * stride]`.
    fn col_at(&self, row: usize, i: usize) -> IT;
    /// Equivalent to `values[row + i * stride]`.
    fn value_at(&self, row: usize, i: usize) -> MV;
}

/// Owning ELL matrix: logical shape `rows x cols`, at most
/// `max_nnz_per_row` stored entries per row, row-panel stride `stride`.
#[derive(Debug, Clone)]
pub struct Ell<MV: Scalar, IT: IndexType> {
    rows: usize,
    cols: usize,
    max_nnz_per_row: usize,
    stride: usize,
    values: Vec<MV>,
    col_idxs: Vec<IT>,
}

impl<MV: Scalar, IT: IndexType> Ell<MV, IT> {
    /// Builds an ELL matrix from raw row-panel buffers, validating shape
    /// and column-index range once at construction.
    pub fn new(
        rows: usize,
        cols: usize,
        max_nnz_per_row: usize,
        stride: usize,
        values: Vec<MV>,
        col_idxs: Vec<IT>,
    ) -> Result<Self> {
        if stride < rows {
            return Err(EllMulError::ShapeMismatch {
                context: "Ell::new: stride must be >= rows",
                expected: rows,
                got: stride,
            });
        }
        let expected_len = stride * max_nnz_per_row;
        if values.len() != expected_len {
            return Err(EllMulError::ShapeMismatch {
                context: "Ell::new: values length",
                expected: expected_len,
                got: values.len(),
            });
        }
        if col_idxs.len() != expected_len {
            return Err(EllMulError::ShapeMismatch {
                context: "Ell::new: col_idxs length",
                expected: expected_len,
                got: col_idxs.len(),
            });
        }

        for row in 0..rows {
            for i in 0..max_nnz_per_row {
                let col = col_idxs[row + i * stride];
                if col == IT::INVALID {
                    continue;
                }
                let c = col.to_i64();
                if c < 0 || c as usize >= cols {
                    return Err(EllMulError::InvalidColumnIndex {
                        row,
                        slot: i,
                        col: c,
                        num_cols: cols,
                    });
                }
            }
        }

        Ok(Self {
            rows,
            cols,
            max_nnz_per_row,
            stride,
            values,
            col_idxs,
        })
    }

    /// Builds an `Ell` from an identity matrix of the given size (K=1,
    /// `col_idxs[r] = r`, `values[r] = 1`). Handy for scenario tests (spec
    /// §8, E1/E3/E4/E6) and for the demo binary.
    pub fn identity(n: usize) -> Self
    where
        MV: num_traits::One,
    {
        let values = vec![MV::one(); n];
        let col_idxs = (0..n).map(IT::from_usize).collect();
        Self::new(n, n, 1, n, values, col_idxs).expect("identity matrix is always well-formed")
    }

    /// Scans a dense matrix row by row and packs its non-zeros into ELL
    /// row-panel form, padding each row out to `max_nnz_per_row` with the
    /// sentinel. Not a hot-path routine — this is for building test
    /// fixtures and property-test inputs (spec §1 leaves conversion from
    /// other formats to the owning container, out of scope for the kernel
    /// itself; this exists only so the crate has a way to produce an `Ell`
    /// from arbitrary test data).
    pub fn from_dense<D: DenseLike<MV>>(dense: &D, max_nnz_per_row: usize) -> Result<Self> {
        let (rows, cols) = dense.size();
        let stride = rows;
        let mut values = vec![MV::default(); stride * max_nnz_per_row];
        let mut col_idxs = vec![IT::INVALID; stride * max_nnz_per_row];

        for row in 0..rows {
            let mut slot = 0;
            for col in 0..cols {
                let v = dense.at(row, col);
                if v.is_zero() {
                    continue;
                }
                if slot >= max_nnz_per_row {
                    return Err(EllMulError::ShapeMismatch {
                        context: "Ell::from_dense: row exceeds max_nnz_per_row",
                        expected: max_nnz_per_row,
                        got: slot + 1,
                    });
                }
                values[row + slot * stride] = v;
                col_idxs[row + slot * stride] = IT::from_usize(col);
                slot += 1;
            }
        }

        Self::new(rows, cols, max_nnz_per_row, stride, values, col_idxs)
    }
}

impl<MV: Scalar, IT: IndexType> EllLike<MV, IT> for Ell<MV, IT> {
    #[inline(always)]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    fn num_stored_elements_per_row(&self) -> usize {
        self.max_nnz_per_row
    }

    #[inline(always)]
    fn stride(&self) -> usize {
        self.stride
    }

    #[inline(always)]
    fn const_values_ptr(&self) -> *const MV {
        self.values.as_ptr()
    }

    #[inline(always)]
    fn const_col_idxs_ptr(&self) -> *const IT {
        self.col_idxs.as_ptr()
    }

    #[inline(always)]
    fn col_at(&self, row: usize, i: usize) -> IT {
        self.col_idxs[row + i * self.stride]
    }

    #[inline(always)]
    fn value_at(&self, row: usize, i: usize) -> MV {
        self.values[row + i * self.stride]
    }
}
