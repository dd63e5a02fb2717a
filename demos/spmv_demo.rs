//! ```bash
//! RUSTFLAGS="-C target-cpu=native" cargo run --example spmv_demo --release
//! ```

use ellmul::{spmv, Dense, DenseLike, Ell, Executor};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

/// Rows/cols of the random sparse matrix.
const N: usize = 20_000;
/// Stored (non-padding) entries per row.
const NNZ_PER_ROW: usize = 16;
/// Number of RHS columns — large enough to land on the blocked kernel.
const NUM_RHS: usize = 8;
/// Deterministic seed for reproducibility.
const SEED: u64 = 42;

fn divider() {
    println!("{}", "─".repeat(60));
}

fn random_ell(rows: usize, cols: usize, k: usize, seed: u64) -> Ell<f64, i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let stride = rows;
    let mut values = vec![0.0f64; stride * k];
    let mut col_idxs = vec![-1i32; stride * k];
    for row in 0..rows {
        for slot in 0..k {
            values[row + slot * stride] = rng.gen::<f64>() * 2.0 - 1.0;
            col_idxs[row + slot * stride] = rng.gen_range(0..cols as i32);
        }
    }
    Ell::new(rows, cols, k, stride, values, col_idxs).unwrap()
}

fn random_dense(rows: usize, cols: usize, seed: u64) -> Dense<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<f64> = (0..rows * cols).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
    Dense::new(rows, cols, cols, data).unwrap()
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              ellmul SpMV Demo & Scaling Check             ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    divider();
    println!("Phase 1 — Generating a random {N}x{N} ELL matrix");
    println!("  Stored entries per row: {NNZ_PER_ROW}");

    let t0 = Instant::now();
    let a = random_ell(N, N, NNZ_PER_ROW, SEED);
    let b = random_dense(N, NUM_RHS, SEED + 1);
    println!("  Generated in {:?}", t0.elapsed());

    divider();
    println!("Phase 2 — Running spmv on the global rayon pool");

    let exec = Executor::default();
    let mut c = Dense::<f64>::new(N, NUM_RHS, NUM_RHS, vec![0.0; N * NUM_RHS]).unwrap();

    let t0 = Instant::now();
    spmv(&exec, &a, &b, &mut c).expect("shapes are consistent by construction");
    let elapsed = t0.elapsed();

    let flops = 2 * N * NNZ_PER_ROW * NUM_RHS;
    println!("  Completed in {elapsed:?}");
    println!(
        "  Throughput: {:.2} GFLOP/s",
        flops as f64 / elapsed.as_secs_f64() / 1e9
    );
    println!("  C[0,0] = {:.6} (sanity check, not a correctness proof)", c.at(0, 0));

    divider();
    println!("Phase 3 — Thread-count scaling");
    for threads in [1usize, 2, 4, rayon::current_num_threads()] {
        let exec = Executor::with_threads(threads);
        let mut c = Dense::<f64>::new(N, NUM_RHS, NUM_RHS, vec![0.0; N * NUM_RHS]).unwrap();
        let t0 = Instant::now();
        spmv(&exec, &a, &b, &mut c).unwrap();
        println!("  {threads:>3} threads: {:?}", t0.elapsed());
    }

    divider();
    println!("Done.");
}
