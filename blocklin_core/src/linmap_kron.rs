use num_traits::{Zero, One};
use alloc::vec::Vec;
use alloc::vec;
use crate::{LinAlgEx, Operator, LinMapError, LinearMap};

//

/// Kronecker product representation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\(A \otimes B\\), whose \\((i, j)\\) block is \\(A_{ij} B\\).
/// Only the two factors are kept; the product is never materialized
/// except by [`LinMapKron::as_dense`].
///
/// Applying it to \\(x = {\rm vec}(X)\\) computes \\({\rm vec}(B X A^T)\\),
/// which costs \\(O(m_B n_B n_A + m_A n_A m_B)\\) instead of \\(O(m_A m_B n_A n_B)\\).
#[derive(Debug, Clone)]
pub struct LinMapKron<L: LinAlgEx>
{
    a: LinearMap<L>,
    b: LinearMap<L>,
}

impl<L: LinAlgEx> LinMapKron<L>
{
    /// Creates an instance.
    ///
    /// Returns [`LinMapKron`] instance of \\(A \otimes B\\).
    pub fn new(a: LinearMap<L>, b: LinearMap<L>) -> Self
    {
        LinMapKron {
            a, b,
        }
    }

    /// Left factor \\(A\\).
    pub fn a(&self) -> &LinearMap<L>
    {
        &self.a
    }

    /// Right factor \\(B\\).
    pub fn b(&self) -> &LinearMap<L>
    {
        &self.b
    }

    pub fn as_dense(&self) -> Vec<L::F>
    {
        let (ma, na) = self.a.size();
        let (mb, nb) = self.b.size();
        let (m, n) = (ma * mb, na * nb);

        let a = self.a.as_dense();
        let b = self.b.as_dense();
        let mut array = vec![L::F::zero(); m * n];

        for j in 0.. na {
            for i in 0.. ma {
                let aij = a[j * ma + i];
                for q in 0.. nb {
                    for p in 0.. mb {
                        array[(j * nb + q) * m + (i * mb + p)] = aij * b[q * mb + p];
                    }
                }
            }
        }

        array
    }

    pub fn transpose(&self) -> Self
    {
        LinMapKron::new(self.a.transpose(), self.b.transpose())
    }

    pub fn scale(&self, alpha: L::F) -> Self
    {
        LinMapKron::new(self.a.scale(alpha), self.b.clone())
    }

    /// Inverse \\(A^{-1} \otimes B^{-1}\\).
    ///
    /// A square product of non-square factors has deficient rank, so it is singular.
    pub fn inverse(&self, eps_zero: L::F) -> Result<Self, LinMapError>
    {
        let (m, n) = self.size();
        if m != n {
            return Err(LinMapError::NotSquare(m, n));
        }

        let a_inv = self.a.inverse(eps_zero).map_err(|_| LinMapError::Singular)?;
        let b_inv = self.b.inverse(eps_zero).map_err(|_| LinMapError::Singular)?;

        Ok(LinMapKron::new(a_inv, b_inv))
    }

    /// Checks if \\((A \otimes B)(C \otimes D) = AC \otimes BD\\) holds,
    /// that is, both pairs of factors are conformable.
    pub fn chains(&self, rhs: &Self) -> bool
    {
        self.a.n() == rhs.a.m() && self.b.n() == rhs.b.m()
    }

    /// Product \\(AC \otimes BD\\), requiring [`LinMapKron::chains`].
    pub fn mult(&self, rhs: &Self) -> Self
    {
        assert!(self.chains(rhs));

        LinMapKron::new(&self.a * &rhs.a, &self.b * &rhs.b)
    }

    fn op_impl(&self, transpose: bool, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        let (ma, na) = self.a.size();
        let (mb, nb) = self.b.size();
        // sizes of op(A) and op(B)
        let (ma, na, mb, nb) = if transpose {(na, ma, nb, mb)} else {(ma, na, mb, nb)};

        assert_eq!(x.len(), na * nb);
        assert_eq!(y.len(), ma * mb);

        if ma == 0 || na == 0 || mb == 0 || nb == 0 {
            L::scale(beta, y);
            return;
        }

        // T = op(B) X, X is nb x na
        let mut t = vec![f0; mb * na];
        for (x_c, t_c) in x.chunks_exact(nb).zip(t.chunks_exact_mut(mb)) {
            if transpose {
                self.b.trans_op(f1, x_c, f0, t_c);
            }
            else {
                self.b.op(f1, x_c, f0, t_c);
            }
        }

        // Y = alpha T op(A)^T + beta Y, row by row
        let mut t_r = vec![f0; na];
        let mut y_r = vec![f0; ma];
        for r in 0.. mb {
            for (c, e) in t_r.iter_mut().enumerate() {
                *e = t[c * mb + r];
            }
            for (c, e) in y_r.iter_mut().enumerate() {
                *e = y[c * mb + r];
            }

            if transpose {
                self.a.trans_op(alpha, &t_r, beta, &mut y_r);
            }
            else {
                self.a.op(alpha, &t_r, beta, &mut y_r);
            }

            for (c, e) in y_r.iter().enumerate() {
                y[c * mb + r] = *e;
            }
        }
    }
}

impl<L: LinAlgEx> Operator<L> for LinMapKron<L>
{
    fn size(&self) -> (usize, usize)
    {
        let (ma, na) = self.a.size();
        let (mb, nb) = self.b.size();

        (ma * mb, na * nb)
    }

    fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        self.op_impl(false, alpha, x, beta, y);
    }

    fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        self.op_impl(true, alpha, x, beta, y);
    }
}

impl<L: LinAlgEx> PartialEq for LinMapKron<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.a == other.a && self.b == other.b
    }
}

//

#[test]
fn test_linmap_kron1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let a = LinearMap::<L>::dense(2, 2, vec![ // column-major
        1., 3.,
        2., 4.,
    ]);
    let b = LinearMap::<L>::dense(2, 3, vec![
        1., 0.,
        2., 1.,
        0., 1.,
    ]);
    let k = LinMapKron::new(a, b);
    assert_eq!(k.size(), (4, 6));

    let dense = k.as_dense();
    // first column is A(:,0) (x) B(:,0)
    assert_eq!(dense[0.. 4], [1., 0., 3., 0.]);

    let x = [1., -1., 2., 0.5, 3., -2.];
    let y = &mut[0.; 4];
    let y_ref = &mut[0.; 4];
    k.op(1., &x, 0., y);
    L::transform_ge(false, 4, 6, 1., &dense, &x, 0., y_ref);
    assert_float_eq!(y.as_ref(), y_ref.as_ref(), abs_all <= 1e-9);

    let xt = [1., 2., -3., 4.];
    let z = &mut[1.; 6];
    let z_ref = &mut[1.; 6];
    k.trans_op(2., &xt, -1., z);
    L::transform_ge(true, 4, 6, 2., &dense, &xt, -1., z_ref);
    assert_float_eq!(z.as_ref(), z_ref.as_ref(), abs_all <= 1e-9);
}
