//! Mixed-precision arithmetic policy.
//!
//! `AT`, the working precision, is the widest of `MV` (matrix value type),
//! `IV` (right-hand-side value type), and `OV` (output value type), ordered
//! `f32 < f64 < Complex32 < Complex64`. Every read from `A`/`B` promotes into
//! `AT`; every write to `C` demotes back out of it. Both directions are
//! monomorphized explicitly below rather than routed through a generic
//! numeric cast, so the inner loop never pays for a dynamic dispatch.

use num_complex::Complex;
use num_traits::Zero;
use std::fmt::Debug;
use std::iter::Sum;
use std::ops::{AddAssign, Mul};

/// Element type shared by `A`, `B`, `C`, and the working-precision accumulator.
pub trait Scalar:
    Copy + Default + Debug + Send + Sync + Zero + Mul<Output = Self> + AddAssign + Sum + 'static
{
    /// Position in the `f32 < f64 < Complex32 < Complex64` ordering.
    const PRECISION_RANK: u8;
}

/// Single-precision complex, matching the original's `complex<float>`.
pub type Complex32 = Complex<f32>;
/// Double-precision complex, matching the original's `complex<double>`.
pub type Complex64 = Complex<f64>;

impl Scalar for f32 {
    const PRECISION_RANK: u8 = 0;
}
impl Scalar for f64 {
    const PRECISION_RANK: u8 = 1;
}
impl Scalar for Complex32 {
    const PRECISION_RANK: u8 = 2;
}
impl Scalar for Complex64 {
    const PRECISION_RANK: u8 = 3;
}

/// Promotes `Self` into the working precision `AT`. Implemented only for
/// pairs where `rank(Self) <= rank(AT)` — promotion never narrows.
pub trait IntoWorking<AT: Scalar>: Scalar {
    fn into_working(self) -> AT;
}

/// Demotes a working-precision value `AT` back into `Self`, using the
/// target type's round-to-nearest-even (`as` cast semantics for floats).
pub trait FromWorking<AT: Scalar>: Scalar {
    fn from_working(v: AT) -> Self;
}

/// Computes the working precision `AT` for a given `(IV, OV)` pair, for a
/// matrix value type `Self = MV`. One explicit impl per `(MV, IV, OV)`
/// triple, per the mixed-precision policy's compile-time selection rule.
pub trait WorkingPrecision3<IV: Scalar, OV: Scalar>: Scalar {
    type AT: Scalar;
}

impl IntoWorking<f32> for f32 {
    #[inline(always)]
    fn into_working(self) -> f32 {
        self
    }
}

impl IntoWorking<f64> for f32 {
    #[inline(always)]
    fn into_working(self) -> f64 {
        self as f64
    }
}

impl IntoWorking<Complex32> for f32 {
    #[inline(always)]
    fn into_working(self) -> Complex32 {
        Complex32::new(self, 0.0)
    }
}

impl IntoWorking<Complex64> for f32 {
    #[inline(always)]
    fn into_working(self) -> Complex64 {
        Complex64::new(self as f64, 0.0)
    }
}

impl IntoWorking<f64> for f64 {
    #[inline(always)]
    fn into_working(self) -> f64 {
        self
    }
}

impl IntoWorking<Complex32> for f64 {
    #[inline(always)]
    fn into_working(self) -> Complex32 {
        Complex32::new(self as f32, 0.0)
    }
}

impl IntoWorking<Complex64> for f64 {
    #[inline(always)]
    fn into_working(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
}

impl IntoWorking<Complex32> for Complex32 {
    #[inline(always)]
    fn into_working(self) -> Complex32 {
        self
    }
}

impl IntoWorking<Complex64> for Complex32 {
    #[inline(always)]
    fn into_working(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }
}

impl IntoWorking<Complex64> for Complex64 {
    #[inline(always)]
    fn into_working(self) -> Complex64 {
        self
    }
}

impl FromWorking<f32> for f32 {
    #[inline(always)]
    fn from_working(v: f32) -> Self {
        v
    }
}

impl FromWorking<f64> for f32 {
    #[inline(always)]
    fn from_working(v: f64) -> Self {
        v as f32
    }
}

impl FromWorking<Complex32> for f32 {
    #[inline(always)]
    fn from_working(v: Complex32) -> Self {
        v.re
    }
}

impl FromWorking<Complex64> for f32 {
    #[inline(always)]
    fn from_working(v: Complex64) -> Self {
        v.re as f32
    }
}

impl FromWorking<f64> for f64 {
    #[inline(always)]
    fn from_working(v: f64) -> Self {
        v
    }
}

impl FromWorking<Complex32> for f64 {
    #[inline(always)]
    fn from_working(v: Complex32) -> Self {
        v.re as f64
    }
}

impl FromWorking<Complex64> for f64 {
    #[inline(always)]
    fn from_working(v: Complex64) -> Self {
        v.re
    }
}

impl FromWorking<Complex32> for Complex32 {
    #[inline(always)]
    fn from_working(v: Complex32) -> Self {
        v
    }
}

impl FromWorking<Complex64> for Complex32 {
    #[inline(always)]
    fn from_working(v: Complex64) -> Self {
        Complex32::new(v.re as f32, v.im as f32)
    }
}

impl FromWorking<Complex64> for Complex64 {
    #[inline(always)]
    fn from_working(v: Complex64) -> Self {
        v
    }
}

impl WorkingPrecision3<f32, f32> for f32 {
    type AT = f32;
}
impl WorkingPrecision3<f32, f64> for f32 {
    type AT = f64;
}
impl WorkingPrecision3<f32, Complex32> for f32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f32, Complex64> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, f32> for f32 {
    type AT = f64;
}
impl WorkingPrecision3<f64, f64> for f32 {
    type AT = f64;
}
impl WorkingPrecision3<f64, Complex32> for f32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f64, Complex64> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, f32> for f32 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, f64> for f32 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, Complex32> for f32 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, Complex64> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f32> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f64> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex32> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex64> for f32 {
    type AT = Complex64;
}
impl WorkingPrecision3<f32, f32> for f64 {
    type AT = f64;
}
impl WorkingPrecision3<f32, f64> for f64 {
    type AT = f64;
}
impl WorkingPrecision3<f32, Complex32> for f64 {
    type AT = Complex32;
}
impl WorkingPrecision3<f32, Complex64> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, f32> for f64 {
    type AT = f64;
}
impl WorkingPrecision3<f64, f64> for f64 {
    type AT = f64;
}
impl WorkingPrecision3<f64, Complex32> for f64 {
    type AT = Complex32;
}
impl WorkingPrecision3<f64, Complex64> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, f32> for f64 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, f64> for f64 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, Complex32> for f64 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, Complex64> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f32> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f64> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex32> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex64> for f64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f32, f32> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f32, f64> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f32, Complex32> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f32, Complex64> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, f32> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f64, f64> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f64, Complex32> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<f64, Complex64> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, f32> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, f64> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, Complex32> for Complex32 {
    type AT = Complex32;
}
impl WorkingPrecision3<Complex32, Complex64> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f32> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f64> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex32> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex64> for Complex32 {
    type AT = Complex64;
}
impl WorkingPrecision3<f32, f32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f32, f64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f32, Complex32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f32, Complex64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, f32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, f64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, Complex32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<f64, Complex64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, f32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, f64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, Complex32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex32, Complex64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, f64> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex32> for Complex64 {
    type AT = Complex64;
}
impl WorkingPrecision3<Complex64, Complex64> for Complex64 {
    type AT = Complex64;
}
