//! Scalar small-RHS kernel (spec §4.3): row-blocked traversal processing
//! `V=4` consecutive rows per iteration, for `R in {1,2,3,4}`, with a
//! scalar tail for rows that don't fill a full block.

use num_traits::Zero;
use rayon::prelude::*;

use crate::accessors::{AView, BView};
use crate::dense::DenseLike;
use crate::ell::{EllLike, IndexType};
use crate::epilogue::Epilogue;
use crate::executor::Executor;
use crate::scalar::{IntoWorking, Scalar};

const ROW_BLOCK: usize = 4;

/// Computes `C[r,j] = out(r, j, sum_i A[r,i] * B[col(r,i), j])` for every
/// row `r` and RHS `j in [0,R)`, for the fixed-`R in {1,2,3,4}` case.
///
/// Row-blocks of `ROW_BLOCK=4` rows run in parallel on `executor`; within
/// each block, `col != INVALID` is masked on every accumulation (spec §9:
/// an implementation MUST mask in both the vectorized block and the tail).
pub fn spmv_small_rhs<const R: usize, E, D, DC, MV, IV, OV, IT, AT, Ep>(
    executor: &Executor,
    a: &E,
    b: &D,
    c: &mut DC,
    epilogue: Ep,
) where
    E: EllLike<MV, IT> + Sync,
    D: DenseLike<IV> + Sync,
    DC: DenseLike<OV>,
    MV: Scalar + IntoWorking<AT>,
    IV: Scalar + IntoWorking<AT>,
    OV: Scalar + IntoWorking<AT> + crate::scalar::FromWorking<AT>,
    IT: IndexType,
    AT: Scalar,
    Ep: Epilogue<AT>,
{
    let rows = a.rows();
    let k = a.num_stored_elements_per_row();
    let (c_rows, _) = c.size();
    debug_assert_eq!(c_rows, rows);
    let c_stride = c.row_stride();

    let a_view = AView::<_, MV, IT>::new(a);
    let b_view = BView::<_, IV>::new(b);

    // SAFETY: `c`'s backing buffer holds at least `c_rows * c_stride`
    // elements (the `Dense`/`DenseLike` shape invariant). Row-blocks below
    // partition that range into disjoint, non-overlapping row ranges, so
    // concurrent mutable access across blocks never aliases.
    let c_slice = unsafe { std::slice::from_raw_parts_mut(c.values_mut_ptr(), c_rows * c_stride) };

    executor.install(|| {
        c_slice
            .par_chunks_mut(ROW_BLOCK * c_stride)
            .enumerate()
            .for_each(|(block_idx, chunk)| {
                let first_row = block_idx * ROW_BLOCK;
                let rows_in_block = chunk.len() / c_stride;

                if rows_in_block == ROW_BLOCK {
                    let mut partial_sum = [[AT::zero(); R]; ROW_BLOCK];
                    for i in 0..k {
                        for next in 0..ROW_BLOCK {
                            let row = first_row + next;
                            let col = a_view.col(row, i);
                            if col == IT::INVALID {
                                continue;
                            }
                            let col = col.to_i64() as usize;
                            let val: AT = a_view.value(row, i);
                            for j in 0..R {
                                let b_val: AT = b_view.at(col, j);
                                partial_sum[next][j] += val * b_val;
                            }
                        }
                    }
                    for next in 0..ROW_BLOCK {
                        for j in 0..R {
                            let prior: AT = chunk[next * c_stride + j].into_working();
                            let out = epilogue.apply(partial_sum[next][j], prior);
                            chunk[next * c_stride + j] = OV::from_working(out);
                        }
                    }
                } else {
                    // Scalar tail: process the remaining rows one at a time,
                    // same masking semantics as the vectorized block above.
                    for next in 0..rows_in_block {
                        let row = first_row + next;
                        let mut partial = [AT::zero(); R];
                        for i in 0..k {
                            let col = a_view.col(row, i);
                            if col == IT::INVALID {
                                continue;
                            }
                            let col = col.to_i64() as usize;
                            let val: AT = a_view.value(row, i);
                            for j in 0..R {
                                let b_val: AT = b_view.at(col, j);
                                partial[j] += val * b_val;
                            }
                        }
                        for j in 0..R {
                            let prior: AT = chunk[next * c_stride + j].into_working();
                            let out = epilogue.apply(partial[j], prior);
                            chunk[next * c_stride + j] = OV::from_working(out);
                        }
                    }
                }
            });
    });
}
