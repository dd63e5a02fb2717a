//! # ellmul — parallel ELL sparse matrix × dense matrix multiplication
//!
//! ## Architecture overview
//!
//! `A` is a sparse matrix in ELL (ELLPACK) format: `rows` logical rows,
//! each holding at most `max_nnz_per_row` stored entries, packed into two
//! flat `stride`-strided buffers (`values`, `col_idxs`). `B` and `C` are
//! row-major dense matrices. [`kernels::spmv`] computes `C := A * B`;
//! [`kernels::advanced_spmv`] computes `C := alpha * A * B + beta * C`.
//!
//! Reads from `A` and `B` are promoted into a working precision `AT` — the
//! widest of `A`'s, `B`'s, and `C`'s element types — via [`scalar::IntoWorking`],
//! computed once per call by [`scalar::WorkingPrecision3`], and demoted back
//! into `C`'s element type on write via [`scalar::FromWorking`]. See
//! [`scalar`] for the full promotion/demotion policy.
//!
//! ## Kernel selection
//!
//! [`kernels::spmv`]/[`kernels::advanced_spmv`] dispatch on the number of
//! RHS columns:
//!   - a single column on an AVX-512-capable x86_64 host with
//!     `f64`/`f64`/`f64`/`i32` buffers takes the masked-gather SIMD path
//!     ([`kernels::simd_avx512`]);
//!   - 1 to 4 columns otherwise take the row-blocked scalar kernel
//!     ([`kernels::scalar_small_rhs`]);
//!   - 5 or more columns take the RHS-blocked kernel
//!     ([`kernels::blocked`]).
//!
//! Row ranges are partitioned once and handed to disjoint rayon tasks — see
//! [`executor::Executor`] — so every output cell is written by exactly one
//! thread and no locking is needed in the hot path.
//!
//! ## Ambient stack
//!
//! Errors are typed ([`error::EllMulError`], via `thiserror`) and returned
//! only from the public shape-checked entry points; the inner per-row loops
//! keep the original design's assert-and-abort policy rather than paying for
//! a branch per element. Dispatch decisions are logged with `tracing`.

pub mod accessors;
pub mod dense;
pub mod ell;
pub mod epilogue;
pub mod error;
pub mod executor;
pub mod kernels;
pub mod scalar;

pub use dense::{Dense, DenseLike};
pub use ell::{Ell, EllLike, IndexType};
pub use epilogue::{Advanced, Epilogue, Identity};
pub use error::{EllMulError, Result};
pub use executor::Executor;
pub use kernels::{advanced_spmv, spmv};
pub use scalar::{Complex32, Complex64, FromWorking, IntoWorking, Scalar, WorkingPrecision3};
