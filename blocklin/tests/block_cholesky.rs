use float_eq::assert_float_eq;
use blocklin::prelude::*;
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

type La = FloatGeneric<f64>;

type ALinearMap = LinearMap<La>;
type ABlockMatrix = BlockMatrix<La>;
type ABlockVector = BlockVector<La>;
type ABlockCholesky = BlockCholesky<La>;

//

fn rand_dense(rng: &mut Xoshiro256StarStar, m: usize, n: usize) -> ALinearMap
{
    ALinearMap::dense(m, n, (0.. m * n).map(|_| rng.gen_range(-1. ..= 1.)).collect())
}

fn rand_vec(rng: &mut Xoshiro256StarStar, n: usize) -> Vec<f64>
{
    (0.. n).map(|_| rng.gen_range(-1. ..= 1.)).collect()
}

/// G^T G + I with blocks of every representation, variables named by `keys`.
fn rand_spd(seed: u64, keys: [&str; 3]) -> (ABlockMatrix, ABlockVector)
{
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let [x, y, z] = keys;

    let kx = ALinearMap::kron(rand_dense(&mut rng, 2, 2), rand_dense(&mut rng, 2, 2));
    let dy = ALinearMap::diag(rand_vec(&mut rng, 3));

    let g = ABlockMatrix::new()
        .with("r1", x, kx)
        .with("r1", y, rand_dense(&mut rng, 4, 3))
        .with("r2", y, dy)
        .with("r2", z, rand_dense(&mut rng, 3, 2))
        .with("r3", z, ALinearMap::scalar(2, 1.5))
        .with("r3", x, rand_dense(&mut rng, 2, 4));

    let a = &(&g.transpose() * &g) + &g.right_identity();

    let b = ABlockVector::new()
        .with(x, rand_vec(&mut rng, 4))
        .with(y, rand_vec(&mut rng, 3))
        .with(z, rand_vec(&mut rng, 2));

    (a, b)
}

/// Sparse chain x - w - y - z, diagonally dominant with Kron, Diag and Scalar diagonal blocks.
fn chain_spd(seed: u64) -> (ABlockMatrix, ABlockVector)
{
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);

    let p = ALinearMap::dense(2, 2, vec![3., 0.5, 0.5, 3.]);
    let dims = [("x", 4), ("w", 3), ("y", 2), ("z", 2)];

    let mut a = ABlockMatrix::new()
        .with("x", "x", ALinearMap::kron(p.clone(), p))
        .with("w", "w", ALinearMap::diag(vec![5., 6., 7.]))
        .with("y", "y", ALinearMap::scalar(2, 4.))
        .with("z", "z", ALinearMap::diag(vec![5., 5.]));

    for pair in dims.windows(2) {
        let ((r, m), (c, n)) = (pair[0], pair[1]);
        let off = ALinearMap::dense(m, n, (0.. m * n).map(|_| rng.gen_range(-0.1 ..= 0.1)).collect());
        a.insert_or_add(c, r, off.transpose());
        a.insert_or_add(r, c, off);
    }

    let b = dims.iter().map(|&(k, n)| (k, rand_vec(&mut rng, n))).collect();

    (a, b)
}

fn assert_block_eq(u: &ABlockVector, v: &ABlockVector, tol: f64)
{
    assert_eq!(u.keys().collect::<Vec<_>>(), v.keys().collect::<Vec<_>>());
    for (k, u_k) in u.iter() {
        assert_float_eq!(u_k.as_slice(), v.get(k).unwrap(), abs_all <= tol);
    }
}

//

#[test]
fn test_cholesky_identity()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = ABlockMatrix::identity([("x", 2), ("y", 3)]);
    let b = ABlockVector::new()
        .with("x", vec![1., -2.])
        .with("y", vec![0.5, 4., 8.]);

    let factor = ABlockCholesky::new().compute(&a).unwrap();
    assert_eq!(factor.solve(&b), b);
}

#[test]
fn test_cholesky_scalar()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = ABlockMatrix::new().with("x", "x", ALinearMap::scalar(2, 2.));
    let b = ABlockVector::new().with("x", vec![2., 4.]);

    let factor = ABlockCholesky::new().compute(&a).unwrap();
    let x = factor.solve(&b);
    assert_float_eq!(x.get("x").unwrap(), [1., 2.].as_ref(), abs_all <= 1e-12);
}

#[test]
fn test_cholesky_rand()
{
    let _ = env_logger::builder().is_test(true).try_init();

    for seed in 0.. 5 {
        let (a, b) = rand_spd(seed, ["x", "y", "z"]);

        let factor = ABlockCholesky::new().compute(&a).unwrap();
        assert_eq!(factor.order().len(), 3);

        let x = factor.solve(&b);
        assert_block_eq(&(&a * &x), &b, 1e-8);

        // repeated solves against the same factor
        let x2 = factor.solve(&b.scale(2.));
        assert_block_eq(&x2, &x.scale(2.), 1e-8);
    }
}

#[test]
fn test_cholesky_order()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (a, b) = rand_spd(7, ["x", "y", "z"]);

    let x_minfill = ABlockCholesky::new().compute(&a).unwrap().solve(&b);
    let x_natural = ABlockCholesky::new()
        .par(|p| {p.pivot = PivotOrder::Natural})
        .compute(&a).unwrap()
        .solve(&b);
    assert_block_eq(&x_minfill, &x_natural, 1e-8);

    // same system under other names, which changes the sorted order of keys
    let (a_r, b_r) = rand_spd(7, ["w3", "w1", "w2"]);
    let x_r = ABlockCholesky::new().compute(&a_r).unwrap().solve(&b_r);
    for (k, k_r) in [("x", "w3"), ("y", "w1"), ("z", "w2")] {
        assert_float_eq!(x_minfill.get(k).unwrap(), x_r.get(k_r).unwrap(), abs_all <= 1e-8);
    }
}

#[test]
fn test_cholesky_partial_rhs()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (a, _) = rand_spd(3, ["x", "y", "z"]);
    let b = ABlockVector::new()
        .with("y", vec![1., 0., -1.])
        .with("unknown", vec![9.]);

    let x = ABlockCholesky::new().compute(&a).unwrap().solve(&b);
    assert_eq!(x.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);

    let mut b_full = b.clone();
    b_full.remove("unknown");
    assert_block_eq(&(&a * &x), &(&b_full + &ABlockVector::new().with("x", vec![0.; 4]).with("z", vec![0.; 2])), 1e-8);
}

#[test]
fn test_cholesky_singular()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = ABlockMatrix::new()
        .with("x", "x", ALinearMap::identity(2))
        .with("y", "y", ALinearMap::diag(vec![1., 0.]));

    let err = ABlockCholesky::new().compute(&a).unwrap_err();
    assert_eq!(err, BlockError::Pivot { key: "y".to_string(), err: blocklin_core::LinMapError::Singular });

    let err = ABlockCholesky::new()
        .par(|p| {p.eps_zero = 2.})
        .compute(&ABlockMatrix::identity([("x", 1)]))
        .unwrap_err();
    assert_eq!(err, BlockError::Pivot { key: "x".to_string(), err: blocklin_core::LinMapError::Singular });
}

#[test]
fn test_cholesky_missing_diagonal()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let a = ABlockMatrix::new()
        .with("y", "y", ALinearMap::identity(1))
        .with("x", "y", ALinearMap::identity(1))
        .with("y", "x", ALinearMap::identity(1));

    for pivot in [PivotOrder::MinFill, PivotOrder::Natural] {
        let err = ABlockCholesky::new()
            .par(|p| {p.pivot = pivot})
            .compute(&a)
            .unwrap_err();
        assert_eq!(err, BlockError::MissingDiagonal("x".to_string()));
    }
}

#[test]
fn test_cholesky_threads()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let (a, b) = rand_spd(11, ["x", "y", "z"]);
    let factor = ABlockCholesky::new().compute(&a).unwrap();
    let x_ref = factor.solve(&b);

    let results: Vec<ABlockVector> = std::thread::scope(|s| {
        let handles: Vec<_> = (0.. 4).map(|_| s.spawn(|| factor.solve(&b))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for x in results.iter() {
        assert_eq!(*x, x_ref);
    }
}

#[test]
fn test_cholesky_chain_fill()
{
    let _ = env_logger::builder().is_test(true).try_init();

    for seed in 0.. 3 {
        let (a, b) = chain_spd(seed);
        assert!(a.get("y", "x").is_none());

        let minfill = ABlockCholesky::new().compute(&a).unwrap();
        assert_eq!(minfill.order().len(), 4);
        assert_block_eq(&(&a * &minfill.solve(&b)), &b, 1e-9);

        // w goes first and couples x with y
        let natural = ABlockCholesky::new()
            .par(|p| {p.pivot = PivotOrder::Natural})
            .compute(&a).unwrap();
        assert_eq!(natural.order(), ["w", "x", "y", "z"]);
        assert!(natural.l().get("y", "x").is_some());
        assert_block_eq(&(&a * &natural.solve(&b)), &b, 1e-9);
    }
}
