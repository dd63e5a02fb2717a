//! Accessor views (spec §4.2): lazy, stride-aware, bounds-check-free reads
//! over `A`'s and `B`'s raw buffers that promote into the working
//! precision `AT` on the way out. Zero-overhead value-semantics wrappers —
//! no heap allocation, no ownership of the underlying buffer.

use crate::dense::DenseLike;
use crate::ell::{EllLike, IndexType};
use crate::scalar::{IntoWorking, Scalar};

/// View over `A`'s raw `values`/`col_idxs` buffers, promoting `MV` into `AT`.
pub struct AView<'a, E, MV, IT>
where
    E: EllLike<MV, IT>,
    MV: Scalar,
    IT: IndexType,
{
    ell: &'a E,
    _marker: std::marker::PhantomData<(MV, IT)>,
}

impl<'a, E, MV, IT> AView<'a, E, MV, IT>
where
    E: EllLike<MV, IT>,
    MV: Scalar,
    IT: IndexType,
{
    #[inline(always)]
    pub fn new(ell: &'a E) -> Self {
        Self {
            ell,
            _marker: std::marker::PhantomData,
        }
    }

    /// `AT(values[row + i * stride])`. Caller must ensure `row + i * stride`
    /// is in bounds — this view performs no runtime bounds check (spec §4.2).
    #[inline(always)]
    pub fn value<AT: Scalar>(&self, row: usize, i: usize) -> AT
    where
        MV: IntoWorking<AT>,
    {
        self.ell.value_at(row, i).into_working()
    }

    #[inline(always)]
    pub fn col(&self, row: usize, i: usize) -> IT {
        self.ell.col_at(row, i)
    }
}

/// View over `B`'s raw buffer, promoting `IV` into `AT`.
pub struct BView<'a, D, IV>
where
    D: DenseLike<IV>,
    IV: Scalar,
{
    dense: &'a D,
    _marker: std::marker::PhantomData<IV>,
}

impl<'a, D, IV> BView<'a, D, IV>
where
    D: DenseLike<IV>,
    IV: Scalar,
{
    #[inline(always)]
    pub fn new(dense: &'a D) -> Self {
        Self {
            dense,
            _marker: std::marker::PhantomData,
        }
    }

    /// `AT(B_raw[r * B_stride + j])`.
    #[inline(always)]
    pub fn at<AT: Scalar>(&self, r: usize, j: usize) -> AT
    where
        IV: IntoWorking<AT>,
    {
        self.dense.at(r, j).into_working()
    }
}
