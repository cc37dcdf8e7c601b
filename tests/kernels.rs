use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use symtrans::kernels::{Kernel, ParallelBlocked, Variant};
use symtrans::matrix::Matrix;
use symtrans::validate::{is_symmetric, is_transpose_of};
use symtrans::EPSILON;

const SIZES: &[usize] = &[1, 2, 4, 8, 32, 64, 128, 256];

fn all_kernels() -> Vec<Box<dyn Kernel>> {
    Variant::ALL.iter().map(|v| v.kernel(4).unwrap()).collect()
}

fn transpose_with(kernel: &dyn Kernel, m: &Matrix) -> Matrix {
    let mut t = Matrix::zeros(m.n()).unwrap();
    kernel.transpose(m, &mut t);
    t
}

#[test]
fn test_symmetric_input_accepted_by_every_variant() {
    let mut rng = StdRng::seed_from_u64(42);
    for &n in SIZES {
        let m = Matrix::random_symmetric(n, &mut rng).unwrap();
        for kernel in all_kernels() {
            assert!(
                kernel.check_symmetric(&m),
                "{} rejected a symmetric {n}x{n} matrix",
                kernel.variant()
            );
        }
    }
}

#[test]
fn test_single_perturbation_rejected_by_every_variant() {
    let mut rng = StdRng::seed_from_u64(7);
    for &n in SIZES.iter().filter(|&&n| n > 1) {
        for _ in 0..8 {
            let mut m = Matrix::random_symmetric(n, &mut rng).unwrap();
            let i = rng.random_range(1..n);
            let j = rng.random_range(0..i);
            m.set(i, j, m.get(i, j) + 1.0);

            for kernel in all_kernels() {
                assert!(
                    !kernel.check_symmetric(&m),
                    "{} missed M[{i}][{j}] on {n}x{n}",
                    kernel.variant()
                );
            }
        }
    }
}

#[test]
fn test_perturbation_next_to_diagonal() {
    // last column compared in each row, including the vectorized tail
    let n = 64;
    for i in 1..n {
        let mut m = Matrix::identity(n).unwrap();
        m.set(i, i - 1, 3.0);
        for kernel in all_kernels() {
            assert!(!kernel.check_symmetric(&m), "{} at row {i}", kernel.variant());
        }
    }
}

#[test]
fn test_variants_agree_and_transposes_are_bit_identical() {
    let mut rng = StdRng::seed_from_u64(1234);
    for &n in SIZES {
        let m = Matrix::random(n, &mut rng).unwrap();
        let kernels = all_kernels();

        let expected_sym = is_symmetric(&m);
        let reference = transpose_with(kernels[0].as_ref(), &m);
        assert!(is_transpose_of(&m, &reference));

        for kernel in &kernels {
            assert_eq!(kernel.check_symmetric(&m), expected_sym, "{}", kernel.variant());

            let t = transpose_with(kernel.as_ref(), &m);
            let same_bits = t
                .as_slice()
                .iter()
                .zip(reference.as_slice())
                .all(|(a, b)| a.to_bits() == b.to_bits());
            assert!(same_bits, "{} transpose differs on {n}x{n}", kernel.variant());
        }
    }
}

#[test]
fn test_transpose_is_an_involution() {
    let mut rng = StdRng::seed_from_u64(99);
    let m = Matrix::random(128, &mut rng).unwrap();
    for kernel in all_kernels() {
        let t = transpose_with(kernel.as_ref(), &m);
        let tt = transpose_with(kernel.as_ref(), &t);
        assert_eq!(tt, m, "{}", kernel.variant());
    }
}

#[test]
fn test_transpose_overwrites_target() {
    let m = Matrix::identity(32).unwrap();
    for kernel in all_kernels() {
        let mut t = Matrix::from_fn(32, |_, _| f64::NAN).unwrap();
        kernel.transpose(&m, &mut t);
        assert_eq!(t, m, "{}", kernel.variant());
    }
}

#[test]
fn test_epsilon_boundary() {
    let n = 64;

    let mut m = Matrix::zeros(n).unwrap();
    m.set(40, 3, EPSILON);
    for kernel in all_kernels() {
        assert!(kernel.check_symmetric(&m), "{} at EPSILON", kernel.variant());
    }

    let mut m = Matrix::zeros(n).unwrap();
    m.set(40, 3, f64::from_bits(EPSILON.to_bits() + 1));
    for kernel in all_kernels() {
        assert!(!kernel.check_symmetric(&m), "{} at EPSILON + 1 ulp", kernel.variant());
    }
}

#[test]
fn test_nan_is_never_symmetric() {
    let mut m = Matrix::identity(16).unwrap();
    m.set(5, 5, f64::NAN);
    m.set(9, 2, f64::NAN);
    m.set(2, 9, f64::NAN);
    for kernel in all_kernels() {
        assert!(!kernel.check_symmetric(&m), "{}", kernel.variant());
    }
}

#[test]
fn test_nan_only_on_diagonal_agrees_with_validator() {
    for d in [0, 4, 5] {
        let mut m = Matrix::identity(16).unwrap();
        m.set(d, d, f64::NAN);
        let expected = is_symmetric(&m);
        assert!(!expected);

        for kernel in all_kernels() {
            assert_eq!(
                kernel.check_symmetric(&m),
                expected,
                "{} with NaN at ({d}, {d})",
                kernel.variant()
            );
        }
    }
}

#[test]
fn test_thread_count_invariance() {
    let mut rng = StdRng::seed_from_u64(5);
    let symmetric = Matrix::random_symmetric(256, &mut rng).unwrap();
    let mut perturbed = symmetric.clone();
    perturbed.set(200, 17, perturbed.get(200, 17) - 0.5);

    let mut reference: Option<Matrix> = None;
    for threads in [1, 2, 4, 8] {
        let kernel = ParallelBlocked::new(threads).unwrap();
        assert!(kernel.check_symmetric(&symmetric), "{threads} threads");
        assert!(!kernel.check_symmetric(&perturbed), "{threads} threads");

        let t = transpose_with(&kernel, &perturbed);
        match &reference {
            Some(r) => assert_eq!(&t, r, "{threads} threads"),
            None => reference = Some(t),
        }
    }
}

#[test]
fn test_identity_4x4() {
    let m = Matrix::identity(4).unwrap();
    for kernel in all_kernels() {
        assert!(kernel.check_symmetric(&m), "{}", kernel.variant());
        assert_eq!(transpose_with(kernel.as_ref(), &m), m, "{}", kernel.variant());
    }
}

#[test]
fn test_4x4_with_single_off_diagonal_entry() {
    let mut m = Matrix::identity(4).unwrap();
    m.set(0, 1, 5.0);

    for kernel in all_kernels() {
        assert!(!kernel.check_symmetric(&m), "{}", kernel.variant());

        let t = transpose_with(kernel.as_ref(), &m);
        assert_eq!(t.get(1, 0), 5.0, "{}", kernel.variant());
        assert_eq!(t.get(0, 1), 0.0, "{}", kernel.variant());
        assert!(is_transpose_of(&m, &t));
    }
}

#[test]
fn test_comparison_counts() {
    let n = 64;
    let counts: Vec<(Variant, u64)> = all_kernels()
        .iter()
        .map(|k| (k.variant(), k.comparisons(n)))
        .collect();

    for (variant, count) in counts {
        let expected = match variant {
            Variant::Sequential => (n * (n + 1) / 2) as u64,
            // 2x2 grid of 32-wide tiles, 3 tile pairs
            Variant::Blocked | Variant::Prefetch => 3 * 32 * 32,
            // groups of four up to the diagonal, plus the diagonal when no group reached it
            Variant::Vectorized => (0..n)
                .map(|i| (4 * i.div_ceil(4)).max(i + 1))
                .sum::<usize>() as u64,
            // 4 threads: 16-wide tiles, 4x4 grid
            Variant::Parallel => 10 * 16 * 16,
        };
        assert_eq!(count, expected, "{variant}");
    }
}
