//! SIMD single-RHS kernel (spec §4.4): AVX-512 specialization for the exact
//! type tuple `(MV, IV, OV, IT) = (f64, f64, f64, i32)` and `R=1`, plain
//! SpMV only (identity epilogue). `V=8`-wide FMA with a masked 32-bit
//! gather so padding slots (`col == INVALID`) never issue a load against
//! `B` (spec §4.4 rationale).
//!
//! Dispatch onto this path is gated twice: once statically by the type
//! tuple (via `TypeId`, since Rust has no partial specialization to do
//! this at compile time the way the original's C++ templates do), and
//! once at runtime by `is_x86_feature_detected!("avx512f")`. A 64-bit
//! index build, or a CPU without AVX-512F, always falls back to the
//! generic scalar R=1 kernel (spec §6, §9).

use std::any::TypeId;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::dense::DenseLike;
use crate::ell::{EllLike, IndexType};
use crate::executor::Executor;
use crate::scalar::Scalar;

const ROW_BLOCK: usize = 8;

/// True when the runtime CPU and the `(MV, IV, OV, IT)` type tuple both
/// allow the AVX-512 fast path for `num_rhs == 1`.
pub fn simd_path_eligible<MV: 'static, IV: 'static, OV: 'static, IT: IndexType>(
    num_rhs: usize,
) -> bool {
    num_rhs == 1
        && IT::IS_32_BIT
        && TypeId::of::<MV>() == TypeId::of::<f64>()
        && TypeId::of::<IV>() == TypeId::of::<f64>()
        && TypeId::of::<OV>() == TypeId::of::<f64>()
        && avx512f_available()
}

/// Cached `is_x86_feature_detected!("avx512f")`. CPU features don't change
/// at runtime, so the check only needs to run once per process.
fn avx512f_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        static CHECKED: AtomicBool = AtomicBool::new(false);
        static AVAILABLE: AtomicBool = AtomicBool::new(false);
        if !CHECKED.load(Ordering::Relaxed) {
            AVAILABLE.store(is_x86_feature_detected!("avx512f"), Ordering::Relaxed);
            CHECKED.store(true, Ordering::Relaxed);
        }
        AVAILABLE.load(Ordering::Relaxed)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Entry point called by the dispatcher once `simd_path_eligible` returns
/// true. Transmutes the generic buffer pointers into their concrete `f64`/
/// `i32` form — sound because `simd_path_eligible` already established
/// `MV = IV = OV = f64` and `IT = i32` via `TypeId`/`IndexType::IS_32_BIT`,
/// so the pointee types really are identical, not just equal-sized.
pub fn spmv_simd_r1<E, D, DC, MV, IV, OV, IT>(executor: &Executor, a: &E, b: &D, c: &mut DC)
where
    E: EllLike<MV, IT> + Sync,
    D: DenseLike<IV> + Sync,
    DC: DenseLike<OV>,
    MV: Scalar,
    IV: Scalar,
    OV: Scalar,
    IT: IndexType,
{
    let rows = a.rows();
    let k = a.num_stored_elements_per_row();
    let a_stride = a.stride();
    let b_stride = b.row_stride();
    let c_stride = c.row_stride();

    // SAFETY: see module docs — the caller has already verified the type
    // tuple via `simd_path_eligible`.
    unsafe {
        let values = a.const_values_ptr() as *const f64;
        let col_idxs = a.const_col_idxs_ptr() as *const i32;
        let b_ptr = b.const_values_ptr() as *const f64;
        let c_ptr = c.values_mut_ptr() as *mut f64;

        let c_slice = std::slice::from_raw_parts_mut(c_ptr, rows * c_stride);

        executor.install(|| {
            c_slice
                .par_chunks_mut(ROW_BLOCK * c_stride)
                .enumerate()
                .for_each(|(block_idx, chunk)| {
                    let first_row = block_idx * ROW_BLOCK;
                    let rows_in_block = chunk.len() / c_stride;
                    if rows_in_block == ROW_BLOCK {
                        row_block_avx512(values, col_idxs, first_row, a_stride, k, b_ptr, b_stride, chunk, c_stride);
                    } else {
                        for next in 0..rows_in_block {
                            let row = first_row + next;
                            chunk[next * c_stride] =
                                scalar_row(values, col_idxs, row, a_stride, k, b_ptr, b_stride);
                        }
                    }
                });
        });
    }
}

#[inline(always)]
unsafe fn scalar_row(
    values: *const f64,
    col_idxs: *const i32,
    row: usize,
    a_stride: usize,
    k: usize,
    b_ptr: *const f64,
    b_stride: usize,
) -> f64 {
    let mut acc = 0.0f64;
    for i in 0..k {
        let off = row + i * a_stride;
        let col = *col_idxs.add(off);
        if col == -1 {
            continue;
        }
        acc += *values.add(off) * *b_ptr.add(col as usize * b_stride);
    }
    acc
}

/// Processes one `ROW_BLOCK=8` row block with 512-bit masked-gather FMA.
///
/// # Safety
/// `values`/`col_idxs` must have `first_row + (ROW_BLOCK-1) + (k-1)*a_stride`
/// as a valid index; `chunk` must hold `ROW_BLOCK * c_stride` writable `f64`s.
#[target_feature(enable = "avx512f,avx2")]
#[allow(clippy::too_many_arguments)]
unsafe fn row_block_avx512(
    values: *const f64,
    col_idxs: *const i32,
    first_row: usize,
    a_stride: usize,
    k: usize,
    b_ptr: *const f64,
    b_stride: usize,
    chunk: &mut [f64],
    c_stride: usize,
) {
    use std::arch::x86_64::*;

    let mut partial = _mm512_setzero_pd();
    let invalid = _mm256_set1_epi32(-1);
    let stride_vec = _mm256_set1_epi32(b_stride as i32);

    for i in 0..k {
        let off = first_row + i * a_stride;
        let vals = _mm512_loadu_pd(values.add(off));
        let cols = _mm256_loadu_si256(col_idxs.add(off) as *const __m256i);

        // mask[next] = (col[next] != INVALID); bit per 32-bit lane.
        let eq_invalid = _mm256_cmpeq_epi32(cols, invalid);
        let mask: u8 = !(_mm256_movemask_ps(_mm256_castsi256_ps(eq_invalid)) as u32) as u8;

        // Scale column indices by B's row stride so the gather's fixed
        // byte-scale (8) lands on the right row of B regardless of stride.
        let scaled_cols = _mm256_mullo_epi32(cols, stride_vec);

        // Masked-off lanes never fault even if `scaled_cols` there holds
        // garbage from a sentinel-derived multiply (spec §4.4 rationale).
        let gathered =
            _mm512_mask_i32gather_pd(_mm512_setzero_pd(), mask, scaled_cols, b_ptr as *const u8, 8);

        partial = _mm512_fmadd_pd(vals, gathered, partial);
    }

    // Contiguous store when C's row stride is exactly 1 (the common case
    // for R=1); otherwise store lane-by-lane through a stack array (spec
    // §9: both are correctness-equivalent).
    if c_stride == 1 {
        _mm512_storeu_pd(chunk.as_mut_ptr(), partial);
    } else {
        let mut lanes = [0.0f64; 8];
        _mm512_storeu_pd(lanes.as_mut_ptr(), partial);
        for next in 0..8 {
            chunk[next * c_stride] = lanes[next];
        }
    }
}
