use float_eq::assert_float_eq;
use blocklin::prelude::*;
use blocklin::*;
use blocklin_core::{LinAlgEx, Operator};
use rand::prelude::*;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

type La = FloatGeneric<f64>;

type AMatBuild = MatBuild<La>;
type ALinearMap = LinearMap<La>;
type ABlockMatrix = BlockMatrix<La>;
type ABlockVector = BlockVector<La>;

//

fn rand_dense(rng: &mut Xoshiro256StarStar, m: usize, n: usize) -> ALinearMap
{
    AMatBuild::new(MatType::General(m, n))
        .by_fn(|_, _| rng.gen_range(-1. ..= 1.))
        .to_linmap()
}

fn rand_maps(rng: &mut Xoshiro256StarStar, m: usize, n: usize) -> Vec<ALinearMap>
{
    let mut maps = vec![rand_dense(rng, m, n)];
    if m == n {
        maps.push(ALinearMap::diag((0.. n).map(|_| rng.gen_range(-1. ..= 1.)).collect()));
        maps.push(ALinearMap::scalar(n, rng.gen_range(-1. ..= 1.)));
    }
    if m % 2 == 0 && n % 2 == 0 {
        maps.push(ALinearMap::kron(rand_dense(rng, 2, 2), rand_dense(rng, m / 2, n / 2)));
    }
    maps
}

//

#[test]
fn test_linmap_rand_apply()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(0);

    for (m, n) in [(4, 4), (4, 6), (6, 2), (3, 3)] {
        for k in rand_maps(&mut rng, m, n) {
            let x: Vec<f64> = (0.. n).map(|_| rng.gen_range(-1. ..= 1.)).collect();
            let mut y_ref = vec![0.; m];
            La::transform_ge(false, m, n, 1., &k.as_dense(), &x, 0., &mut y_ref);
            assert_float_eq!(k.apply(&x).as_slice(), y_ref.as_slice(), abs_all <= 1e-9);

            let kt = k.transpose();
            assert_eq!(kt.size(), (n, m));
            assert_eq!(kt.transpose(), k);
        }
    }
}

#[test]
fn test_linmap_rand_assoc()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(1);

    for a in rand_maps(&mut rng, 4, 4) {
        for b in rand_maps(&mut rng, 4, 4) {
            let x: Vec<f64> = (0.. 4).map(|_| rng.gen_range(-1. ..= 1.)).collect();
            let ab = &a * &b;
            assert_float_eq!(ab.apply(&x).as_slice(), a.apply(&b.apply(&x)).as_slice(), abs_all <= 1e-9);

            let s = &a + &b;
            let sx: Vec<f64> = a.apply(&x).iter().zip(b.apply(&x)).map(|(u, v)| u + v).collect();
            assert_float_eq!(s.apply(&x).as_slice(), sx.as_slice(), abs_all <= 1e-9);
        }
    }
}

#[test]
fn test_block_insert_accumulate()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(2);
    let u = rand_dense(&mut rng, 3, 2);
    let w = rand_dense(&mut rng, 3, 2);

    let mut a = ABlockMatrix::new();
    a.insert_or_add("r", "c", u.clone());
    a.insert_or_add("r", "c", w.clone());

    let b = ABlockMatrix::new().with("r", "c", &u + &w);
    assert_eq!(a, b);

    let d = ABlockMatrix::new()
        .with("x", "x", ALinearMap::diag(vec![1., 2.]))
        .with("x", "x", ALinearMap::scalar(2, 3.));
    assert_eq!(d.get("x", "x").map(|a| a.impl_type()), Some(ImplType::Diag));
    assert_eq!(d.get("x", "x").map(|a| a.as_dense()), Some(vec![4., 0., 0., 5.]));
}

#[test]
fn test_block_assoc()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let mut rng = Xoshiro256StarStar::seed_from_u64(3);

    let a = ABlockMatrix::new()
        .with("p", "x", rand_dense(&mut rng, 2, 4))
        .with("q", "x", ALinearMap::kron(ALinearMap::identity(2), rand_dense(&mut rng, 1, 2)))
        .with("q", "y", rand_dense(&mut rng, 2, 3));
    let b = ABlockMatrix::new()
        .with("x", "u", rand_dense(&mut rng, 4, 2))
        .with("y", "u", rand_dense(&mut rng, 3, 2))
        .with("y", "v", ALinearMap::scalar(3, 2.).transpose().scale(0.5));
    let x = ABlockVector::new()
        .with("u", vec![1., -1.])
        .with("v", vec![0.5, 2., -3.])
        .with("w", vec![7.]);

    let ab_x = &(&a * &b) * &x;
    let a_bx = &a * &(&b * &x);
    assert_eq!(ab_x.keys().collect::<Vec<_>>(), vec!["p", "q"]);
    for (k, v) in ab_x.iter() {
        assert_float_eq!(v.as_slice(), a_bx.get(k).unwrap(), abs_all <= 1e-9);
    }

    // (AB)^T = B^T A^T
    let ab_t = (&a * &b).transpose();
    let bt_at = &b.transpose() * &a.transpose();
    assert_eq!(ab_t.row_keys(), bt_at.row_keys());
    assert_eq!(ab_t.col_keys(), bt_at.col_keys());
    for (r, c, blk) in ab_t.iter() {
        let other = bt_at.get(r, c).unwrap();
        assert_float_eq!(blk.as_dense().as_slice(), other.as_dense().as_slice(), abs_all <= 1e-9);
    }

    // A - A has structurally present, numerically zero blocks
    let z = &a - &a;
    assert_eq!(z.col_keys(), a.col_keys());
    for (_, _, blk) in z.iter() {
        assert!(blk.as_dense().iter().all(|e| *e == 0.));
    }
}

#[test]
fn test_block_inverse_reject()
{
    let _ = env_logger::builder().is_test(true).try_init();

    let non_square = ABlockMatrix::new()
        .with("x", "x", ALinearMap::identity(1))
        .with("x", "y", ALinearMap::identity(1));
    assert_eq!(non_square.inverse(1e-12), Err(BlockError::NotSquare(1, 2)));

    let two_rows = ABlockMatrix::new()
        .with("x", "x", ALinearMap::identity(1))
        .with("y", "x", ALinearMap::identity(1))
        .with("y", "y", ALinearMap::identity(1));
    assert_eq!(two_rows.inverse(1e-12), Err(BlockError::NotBlockDiagonal));

    let shared_row = ABlockMatrix::new()
        .with("x", "x", ALinearMap::dense(2, 1, vec![1., 0.]))
        .with("x", "y", ALinearMap::dense(2, 1, vec![0., 1.]));
    assert_eq!(shared_row.inverse(1e-12), Err(BlockError::NotBlockDiagonal));

    let diag = ABlockMatrix::identity([("x", 2), ("y", 1)]).scale(4.);
    let diag_inv = diag.inverse(1e-12).unwrap();
    assert_eq!(&diag * &diag_inv, ABlockMatrix::identity([("x", 2), ("y", 1)]));
}

#[test]
fn test_block_display()
{
    let a = ABlockMatrix::new()
        .with("x", "x", ALinearMap::scalar(2, 1.))
        .with("y", "x", AMatBuild::new(MatType::General(1, 2)).iter_rowmaj(&[1., 2.]).into());

    let s = a.to_string();
    let mut lines = s.lines();
    assert_eq!(lines.next(), Some("block matrix 3 x 2"));
    assert!(lines.next().unwrap().starts_with("(x, x)"));
    assert!(lines.next().unwrap().starts_with("(y, x)"));
    assert!(lines.next().is_none());
}
