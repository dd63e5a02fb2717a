//! Dispatcher (spec §4.7): selects among the scalar small-RHS kernel, the
//! AVX-512 single-RHS kernel, and the blocked multi-RHS kernel by
//! `num_rhs`, with a runtime type check gating the SIMD path.

pub mod blocked;
pub mod scalar_small_rhs;
pub mod simd_avx512;

use tracing::debug;

use crate::dense::DenseLike;
use crate::ell::{EllLike, IndexType};
use crate::epilogue::{Advanced, Epilogue, Identity};
use crate::error::{EllMulError, Result};
use crate::executor::Executor;
use crate::scalar::{FromWorking, IntoWorking, Scalar, WorkingPrecision3};

fn check_spmv_shapes<E, D, DC, MV, IV, OV, IT>(a: &E, b: &D, c: &DC) -> Result<()>
where
    E: EllLike<MV, IT>,
    D: DenseLike<IV>,
    DC: DenseLike<OV>,
    MV: Scalar,
    IV: Scalar,
    OV: Scalar,
    IT: IndexType,
{
    let (b_rows, b_cols) = b.size();
    let (c_rows, c_cols) = c.size();
    if a.cols() != b_rows {
        return Err(EllMulError::DimensionMismatch {
            a_cols: a.cols(),
            b_rows,
        });
    }
    if c_rows != a.rows() || c_cols != b_cols {
        return Err(EllMulError::OutputDimensionMismatch {
            expected: (a.rows(), b_cols),
            got: (c_rows, c_cols),
        });
    }
    Ok(())
}

fn dispatch<E, D, DC, MV, IV, OV, IT, AT, Ep>(
    executor: &Executor,
    a: &E,
    b: &D,
    c: &mut DC,
    num_rhs: usize,
    epilogue: Ep,
) where
    E: EllLike<MV, IT> + Sync + 'static,
    D: DenseLike<IV> + Sync + 'static,
    DC: DenseLike<OV> + 'static,
    MV: Scalar + IntoWorking<AT>,
    IV: Scalar + IntoWorking<AT>,
    OV: Scalar + IntoWorking<AT> + FromWorking<AT>,
    IT: IndexType,
    AT: Scalar,
    Ep: Epilogue<AT> + IsIdentity,
{
    debug!(num_rhs, threads = executor.num_threads(), "dispatching spmv");

    if num_rhs == 0 {
        return;
    }

    if num_rhs == 1
        && epilogue.is_identity()
        && simd_avx512::simd_path_eligible::<MV, IV, OV, IT>(num_rhs)
    {
        debug!("dispatch: avx512 single-rhs path");
        simd_avx512::spmv_simd_r1::<E, D, DC, MV, IV, OV, IT>(executor, a, b, c);
        return;
    }

    match num_rhs {
        1 => {
            debug!("dispatch: scalar small-rhs path (R=1)");
            scalar_small_rhs::spmv_small_rhs::<1, E, D, DC, MV, IV, OV, IT, AT, Ep>(
                executor, a, b, c, epilogue,
            )
        }
        2 => {
            debug!("dispatch: scalar small-rhs path (R=2)");
            scalar_small_rhs::spmv_small_rhs::<2, E, D, DC, MV, IV, OV, IT, AT, Ep>(
                executor, a, b, c, epilogue,
            )
        }
        3 => {
            debug!("dispatch: scalar small-rhs path (R=3)");
            scalar_small_rhs::spmv_small_rhs::<3, E, D, DC, MV, IV, OV, IT, AT, Ep>(
                executor, a, b, c, epilogue,
            )
        }
        4 => {
            debug!("dispatch: scalar small-rhs path (R=4)");
            scalar_small_rhs::spmv_small_rhs::<4, E, D, DC, MV, IV, OV, IT, AT, Ep>(
                executor, a, b, c, epilogue,
            )
        }
        _ => {
            debug!(num_rhs, "dispatch: blocked multi-rhs path");
            blocked::spmv_blocked::<E, D, DC, MV, IV, OV, IT, AT, Ep>(
                executor, a, b, c, num_rhs, epilogue,
            )
        }
    }
}

/// Lets the dispatcher ask "is this the plain, no-op epilogue?" without
/// making `Epilogue` itself carry that knowledge in its hot-path method.
/// Only `Identity` answers `true` — the SIMD path is plain-SpMV-only
/// (spec §4.4).
pub trait IsIdentity {
    fn is_identity(&self) -> bool;
}
impl IsIdentity for Identity {
    #[inline(always)]
    fn is_identity(&self) -> bool {
        true
    }
}
impl<AT: Scalar> IsIdentity for Advanced<AT> {
    #[inline(always)]
    fn is_identity(&self) -> bool {
        false
    }
}

/// Plain SpMV: `C := A * B`.
pub fn spmv<E, D, DC, MV, IV, OV, IT>(executor: &Executor, a: &E, b: &D, c: &mut DC) -> Result<()>
where
    E: EllLike<MV, IT> + Sync + 'static,
    D: DenseLike<IV> + Sync + 'static,
    DC: DenseLike<OV> + 'static,
    MV: Scalar + WorkingPrecision3<IV, OV>,
    IV: Scalar + IntoWorking<<MV as WorkingPrecision3<IV, OV>>::AT>,
    OV: Scalar
        + IntoWorking<<MV as WorkingPrecision3<IV, OV>>::AT>
        + FromWorking<<MV as WorkingPrecision3<IV, OV>>::AT>,
    IT: IndexType,
    MV: IntoWorking<<MV as WorkingPrecision3<IV, OV>>::AT>,
{
    check_spmv_shapes(a, b, c)?;
    dispatch::<E, D, DC, MV, IV, OV, IT, <MV as WorkingPrecision3<IV, OV>>::AT, Identity>(
        executor, a, b, c, b.size().1, Identity,
    );
    Ok(())
}

/// Advanced SpMV: `C := alpha * A * B + beta * C`.
pub fn advanced_spmv<E, D, DC, SA, SB, MV, IV, OV, IT>(
    executor: &Executor,
    alpha: &SA,
    a: &E,
    b: &D,
    beta: &SB,
    c: &mut DC,
) -> Result<()>
where
    E: EllLike<MV, IT> + Sync + 'static,
    D: DenseLike<IV> + Sync + 'static,
    DC: DenseLike<OV> + 'static,
    SA: DenseLike<OV>,
    SB: DenseLike<OV>,
    MV: Scalar + WorkingPrecision3<IV, OV>,
    IV: Scalar + IntoWorking<<MV as WorkingPrecision3<IV, OV>>::AT>,
    OV: Scalar
        + IntoWorking<<MV as WorkingPrecision3<IV, OV>>::AT>
        + FromWorking<<MV as WorkingPrecision3<IV, OV>>::AT>,
    IT: IndexType,
    MV: IntoWorking<<MV as WorkingPrecision3<IV, OV>>::AT>,
{
    check_spmv_shapes(a, b, c)?;
    if alpha.size() != (1, 1) {
        return Err(EllMulError::ScalarShapeMismatch { which: "alpha" });
    }
    if beta.size() != (1, 1) {
        return Err(EllMulError::ScalarShapeMismatch { which: "beta" });
    }

    type AtOf<MV, IV, OV> = <MV as WorkingPrecision3<IV, OV>>::AT;
    let alpha: AtOf<MV, IV, OV> = alpha.at(0, 0).into_working();
    let beta: AtOf<MV, IV, OV> = beta.at(0, 0).into_working();

    dispatch::<E, D, DC, MV, IV, OV, IT, AtOf<MV, IV, OV>, Advanced<AtOf<MV, IV, OV>>>(
        executor,
        a,
        b,
        c,
        b.size().1,
        Advanced { alpha, beta },
    );
    Ok(())
}
