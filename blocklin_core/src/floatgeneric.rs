use num_traits::Float;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use crate::{LinAlg, LinAlgEx};

/// `num::Float`-generic [`LinAlgEx`] implementation
///
/// All numeric operations are written in pure Rust, but slow.
#[derive(Debug, Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float + Debug> LinAlg for FloatGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn dot(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }

    fn copy(x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut[F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut[F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }

    fn transform_di(alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), x.len());
        assert_eq!(mat.len(), y.len());

        for (i, v) in y.iter_mut().enumerate() {
            *v = alpha * mat[i] * x[i] + beta * *v;
        }
    }
}

//

struct MatIdx<'a, F: Float>
{
    n_row: usize,
    n_col: usize,
    mat: &'a[F],
    transpose: bool,
}

impl<'a, F: Float> MatIdx<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        let (r, c) = if !self.transpose {(r, c)} else {(c, r)};

        assert!(r < self.n_row);
        assert!(c < self.n_col);

        c * self.n_row + r
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdx<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

//

struct MatIdxMut<'a, F: Float>
{
    n: usize,
    mat: &'a mut[F],
}

impl<'a, F: Float> MatIdxMut<'a, F>
{
    fn idx(&self, (r, c): (usize, usize)) -> usize
    {
        assert!(r < self.n);
        assert!(c < self.n);

        c * self.n + r
    }

    fn clear(&mut self)
    {
        for a in self.mat.iter_mut() {
            *a = F::zero();
        }
    }
}

impl<'a, F: Float> Index<(usize, usize)> for MatIdxMut<'a, F>
{
    type Output = F;

    fn index(&self, index: (usize, usize)) -> &Self::Output
    {
        &self.mat[self.idx(index)]
    }
}

impl<'a, F: Float> IndexMut<(usize, usize)> for MatIdxMut<'a, F>
{
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output
    {
        let i = self.idx(index);
        &mut self.mat[i]
    }
}

//

// S = L D L^T, L stored below its unit diagonal
fn ldl_decomp<F: Float>(mat_s: &MatIdx<F>, mat_l: &mut MatIdxMut<F>, d: &mut[F], eps_zero: F) -> Result<(), ()>
{
    let n = d.len();

    mat_l.clear();

    for j in 0.. n {
        let mut dj = mat_s[(j, j)];
        for k in 0.. j {
            let ljk = mat_l[(j, k)];
            dj = dj - ljk * ljk * d[k];
        }

        if dj.abs() <= eps_zero {
            return Err(());
        }
        d[j] = dj;
        mat_l[(j, j)] = F::one();

        for i in j + 1.. n {
            let mut lij = mat_s[(i, j)];
            for k in 0.. j {
                lij = lij - mat_l[(i, k)] * mat_l[(j, k)] * d[k];
            }
            mat_l[(i, j)] = lij / dj;
        }
    }

    Ok(())
}

// x = (L D L^T)^-1 x
fn ldl_solve<F: Float>(mat_l: &MatIdxMut<F>, d: &[F], x: &mut[F])
{
    let n = d.len();

    for j in 0.. n {
        let xj = x[j];
        for i in j + 1.. n {
            x[i] = x[i] - mat_l[(i, j)] * xj;
        }
    }

    for i in 0.. n {
        x[i] = x[i] / d[i];
    }

    for j in (0.. n).rev() {
        let mut xj = x[j];
        for i in j + 1.. n {
            xj = xj - mat_l[(i, j)] * x[i];
        }
        x[j] = xj;
    }
}

//

impl<F: Float + Debug> LinAlgEx for FloatGeneric<F>
{
    // y = a*mat*x + b*y
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: F, mat: &[F], x: &[F], beta: F, y: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        if transpose {
            assert_eq!(x.len(), n_row);
            assert_eq!(y.len(), n_col);
        } else {
            assert_eq!(x.len(), n_col);
            assert_eq!(y.len(), n_row);
        };

        let mat = MatIdx {
            n_row, n_col, mat, transpose,
        };

        for r in 0.. y.len() {
            let mut mat_x = F::zero();
            for c in 0.. x.len() {
                mat_x = mat_x + mat[(r, c)] * x[c];
            }
            y[r] = alpha * mat_x + beta * y[r];
        }
    }

    // c = a*op(a)*op(b) + b*c
    fn mult_ge(transa: bool, transb: bool, m: usize, n: usize, k: usize,
        alpha: F, a: &[F], b: &[F], beta: F, c: &mut[F])
    {
        assert_eq!(a.len(), m * k);
        assert_eq!(b.len(), k * n);
        assert_eq!(c.len(), m * n);

        let (ar, ac) = if transa {(k, m)} else {(m, k)};
        let (br, bc) = if transb {(n, k)} else {(k, n)};
        let mat_a = MatIdx {
            n_row: ar, n_col: ac, mat: a, transpose: transa,
        };
        let mat_b = MatIdx {
            n_row: br, n_col: bc, mat: b, transpose: transb,
        };

        for j in 0.. n {
            for i in 0.. m {
                let mut ab = F::zero();
                for l in 0.. k {
                    ab = ab + mat_a[(i, l)] * mat_b[(l, j)];
                }
                c[j * m + i] = alpha * ab + beta * c[j * m + i];
            }
        }
    }

    fn transpose_ge(n_row: usize, n_col: usize, mat: &[F], out: &mut[F])
    {
        assert_eq!(mat.len(), n_row * n_col);
        assert_eq!(out.len(), n_row * n_col);

        for c in 0.. n_col {
            for r in 0.. n_row {
                out[r * n_col + c] = mat[c * n_row + r];
            }
        }
    }

    fn inv_sy_worklen(n: usize) -> usize
    {
        let len_d = n;
        let len_l = n * n;

        len_d + len_l
    }

    fn inv_sy(n: usize, mat: &mut[F], eps_zero: F, work: &mut[F]) -> Result<(), ()>
    {
        assert_eq!(mat.len(), n * n);
        assert!(work.len() >= Self::inv_sy_worklen(n));

        let (d, rest) = work.split_at_mut(n);
        let (l, _) = rest.split_at_mut(n * n);

        let mut mat_l = MatIdxMut {
            n, mat: l,
        };

        {
            let mat_s = MatIdx {
                n_row: n, n_col: n, mat: &*mat, transpose: false,
            };
            ldl_decomp(&mat_s, &mut mat_l, d, eps_zero)?;
        }

        // solve against each column of the identity
        for c in 0.. n {
            let (_, col) = mat.split_at_mut(c * n);
            let (col, _) = col.split_at_mut(n);

            for (i, e) in col.iter_mut().enumerate() {
                *e = if i == c {F::one()} else {F::zero()};
            }
            ldl_solve(&mat_l, d, col);
        }

        Ok(())
    }
}

//

#[test]
fn test_mult_ge1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let a = &[ // 2 x 3, column-major
        1., 4.,
        2., 5.,
        3., 6.,
    ];
    let b = &[ // 3 x 2, column-major
        7., 9., 11.,
        8., 10., 12.,
    ];
    let c = &mut[0.; 4];

    L::mult_ge(false, false, 2, 2, 3, 1., a, b, 0., c);
    assert_float_eq!(c.as_ref(), [58., 139., 64., 154.].as_ref(), abs_all <= 1e-9);

    // (A^T)^T (B^T)^T
    let at = &mut[0.; 6];
    let bt = &mut[0.; 6];
    L::transpose_ge(2, 3, a, at);
    L::transpose_ge(3, 2, b, bt);
    L::mult_ge(true, true, 2, 2, 3, 2., at, bt, -1., c);
    assert_float_eq!(c.as_ref(), [58., 139., 64., 154.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_inv_sy1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let n = 3;
    let s = [
        4., 1., 2.,
        1., 3., 0.,
        2., 0., 5.,
    ];
    let mut s_inv = s;
    let work = &mut[0.; 12];
    assert_eq!(L::inv_sy_worklen(n), work.len());

    L::inv_sy(n, &mut s_inv, 1e-12, work).unwrap();

    let c = &mut[0.; 9];
    L::mult_ge(false, false, n, n, n, 1., &s, &s_inv, 0., c);
    assert_float_eq!(c.as_ref(), [1., 0., 0., 0., 1., 0., 0., 0., 1.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_inv_sy2()
{
    type L = FloatGeneric<f64>;

    let mut s = [
        1., 1.,
        1., 1.,
    ];
    let work = &mut[0.; 6];

    assert!(L::inv_sy(2, &mut s, 1e-12, work).is_err());
}
