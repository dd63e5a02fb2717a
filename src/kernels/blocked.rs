//! Blocked multi-RHS kernel (spec §4.5): row-parallel, no row-blocking;
//! the RHS dimension is traversed in blocks of `B_COL` columns with a
//! remainder pass for the trailing columns.

use rayon::prelude::*;

use crate::accessors::{AView, BView};
use crate::dense::DenseLike;
use crate::ell::{EllLike, IndexType};
use crate::epilogue::Epilogue;
use crate::executor::Executor;
use crate::scalar::{FromWorking, IntoWorking, Scalar};

const B_COL: usize = 4;

/// Computes `C[r,j] = out(r, j, sum_i A[r,i] * B[col(r,i), j])` for every
/// row `r` and every RHS `j in [0, num_rhs)`, sized for `num_rhs > 4`.
pub fn spmv_blocked<E, D, DC, MV, IV, OV, IT, AT, Ep>(
    executor: &Executor,
    a: &E,
    b: &D,
    c: &mut DC,
    num_rhs: usize,
    epilogue: Ep,
) where
    E: EllLike<MV, IT> + Sync,
    D: DenseLike<IV> + Sync,
    DC: DenseLike<OV>,
    MV: Scalar + IntoWorking<AT>,
    IV: Scalar + IntoWorking<AT>,
    OV: Scalar + IntoWorking<AT> + FromWorking<AT>,
    IT: IndexType,
    AT: Scalar,
    Ep: Epilogue<AT>,
{
    let rows = a.rows();
    let k = a.num_stored_elements_per_row();
    let c_stride = c.row_stride();

    let a_view = AView::<_, MV, IT>::new(a);
    let b_view = BView::<_, IV>::new(b);

    // SAFETY: see `spmv_small_rhs` — same disjoint-row-range argument, here
    // split one row at a time instead of in blocks of 4.
    let c_slice = unsafe { std::slice::from_raw_parts_mut(c.values_mut_ptr(), rows * c_stride) };

    let rounded = (num_rhs / B_COL) * B_COL;

    executor.install(|| {
        c_slice
            .par_chunks_mut(c_stride)
            .enumerate()
            .for_each(|(row, c_row)| {
                let mut rhs_base = 0;
                while rhs_base < rounded {
                    let mut acc = [AT::zero(); B_COL];
                    for i in 0..k {
                        let col = a_view.col(row, i);
                        if col == IT::INVALID {
                            continue;
                        }
                        let col = col.to_i64() as usize;
                        let val: AT = a_view.value(row, i);
                        for j in 0..B_COL {
                            let b_val: AT = b_view.at(col, rhs_base + j);
                            acc[j] += val * b_val;
                        }
                    }
                    for j in 0..B_COL {
                        let prior: AT = c_row[rhs_base + j].into_working();
                        c_row[rhs_base + j] = OV::from_working(epilogue.apply(acc[j], prior));
                    }
                    rhs_base += B_COL;
                }

                // RHS tail: columns [rounded, num_rhs), reusing slots [0, num_rhs - rounded).
                let tail_len = num_rhs - rounded;
                if tail_len > 0 {
                    let mut acc = [AT::zero(); B_COL];
                    for i in 0..k {
                        let col = a_view.col(row, i);
                        if col == IT::INVALID {
                            continue;
                        }
                        let col = col.to_i64() as usize;
                        let val: AT = a_view.value(row, i);
                        for j in 0..tail_len {
                            let b_val: AT = b_view.at(col, rounded + j);
                            acc[j] += val * b_val;
                        }
                    }
                    for j in 0..tail_len {
                        let prior: AT = c_row[rounded + j].into_working();
                        c_row[rounded + j] = OV::from_working(epilogue.apply(acc[j], prior));
                    }
                }
            });
    });
}
