use num_traits::{Float, Zero, One};
use alloc::vec::Vec;
use alloc::vec;
use core::marker::PhantomData;
use crate::{LinAlgEx, Operator, LinMapError};

//

/// Diagonal matrix representation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\(D={\bf diag}(d) \in \mathbb{R}^{n \times n}\\).
#[derive(Debug, Clone)]
pub struct LinMapDiag<L: LinAlgEx>
{
    diag: Vec<L::F>,
}

impl<L: LinAlgEx> LinMapDiag<L>
{
    /// Creates an instance.
    ///
    /// Returns [`LinMapDiag`] instance.
    /// * `diag` is a diagonal vector \\(d\\).
    pub fn new(diag: Vec<L::F>) -> Self
    {
        LinMapDiag {
            diag,
        }
    }

    /// Diagonal vector \\(d\\).
    pub fn diag(&self) -> &[L::F]
    {
        &self.diag
    }

    pub fn as_dense(&self) -> Vec<L::F>
    {
        let n = self.diag.len();
        let mut array = vec![L::F::zero(); n * n];
        for (i, d) in self.diag.iter().enumerate() {
            array[i * n + i] = *d;
        }
        array
    }

    pub fn scale(&self, alpha: L::F) -> Self
    {
        let mut diag = self.diag.clone();
        L::scale(alpha, &mut diag);
        LinMapDiag::new(diag)
    }

    /// Elementwise reciprocal.
    ///
    /// * `eps_zero` is a tolerance; any \\(|d_i| \le\\) `eps_zero` is singular.
    pub fn inverse(&self, eps_zero: L::F) -> Result<Self, LinMapError>
    {
        let mut diag = self.diag.clone();
        for d in diag.iter_mut() {
            if d.abs() <= eps_zero {
                return Err(LinMapError::Singular);
            }
            *d = d.recip();
        }
        Ok(LinMapDiag::new(diag))
    }

    /// Product \\({\bf diag}(d)\,{\bf diag}(d')\\).
    pub fn mult(&self, rhs: &Self) -> Self
    {
        assert_eq!(self.diag.len(), rhs.diag.len());

        let mut diag = self.diag.clone();
        for (u, v) in diag.iter_mut().zip(&rhs.diag) {
            *u = *u * *v;
        }
        LinMapDiag::new(diag)
    }

    /// Sum \\({\bf diag}(d) + {\bf diag}(d')\\).
    pub fn add(&self, rhs: &Self) -> Self
    {
        let mut diag = self.diag.clone();
        L::add(L::F::one(), &rhs.diag, &mut diag);
        LinMapDiag::new(diag)
    }
}

impl<L: LinAlgEx> Operator<L> for LinMapDiag<L>
{
    fn size(&self) -> (usize, usize)
    {
        (self.diag.len(), self.diag.len())
    }

    fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        L::transform_di(alpha, &self.diag, x, beta, y);
    }

    fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        L::transform_di(alpha, &self.diag, x, beta, y);
    }
}

impl<L: LinAlgEx> PartialEq for LinMapDiag<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.diag == other.diag
    }
}

//

/// Scalar matrix representation
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// \\(\alpha I_n\\), a diagonal matrix whose diagonals are all the same.
#[derive(Debug, Clone)]
pub struct LinMapScalar<L: LinAlgEx>
{
    ph_l: PhantomData<L>,
    n: usize,
    alpha: L::F,
}

impl<L: LinAlgEx> LinMapScalar<L>
{
    /// Creates an instance.
    ///
    /// Returns [`LinMapScalar`] instance.
    /// * `n` is a number of rows and columns.
    /// * `alpha` is a scalar \\(\alpha\\).
    pub fn new(n: usize, alpha: L::F) -> Self
    {
        LinMapScalar {
            ph_l: PhantomData,
            n,
            alpha,
        }
    }

    /// Scalar \\(\alpha\\).
    pub fn alpha(&self) -> L::F
    {
        self.alpha
    }

    pub fn as_dense(&self) -> Vec<L::F>
    {
        self.to_diag().as_dense()
    }

    pub fn to_diag(&self) -> LinMapDiag<L>
    {
        LinMapDiag::new(vec![self.alpha; self.n])
    }

    pub fn scale(&self, alpha: L::F) -> Self
    {
        LinMapScalar::new(self.n, alpha * self.alpha)
    }

    pub fn inverse(&self, eps_zero: L::F) -> Result<Self, LinMapError>
    {
        if self.n > 0 && self.alpha.abs() <= eps_zero {
            Err(LinMapError::Singular)
        }
        else {
            Ok(LinMapScalar::new(self.n, self.alpha.recip()))
        }
    }
}

impl<L: LinAlgEx> Operator<L> for LinMapScalar<L>
{
    fn size(&self) -> (usize, usize)
    {
        (self.n, self.n)
    }

    fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        assert_eq!(x.len(), self.n);

        if beta == L::F::zero() {
            // y is overwritten, not read
            L::copy(x, y);
            L::scale(alpha * self.alpha, y);
        }
        else {
            L::scale(beta, y);
            L::add(alpha * self.alpha, x, y);
        }
    }

    fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        self.op(alpha, x, beta, y);
    }
}

impl<L: LinAlgEx> PartialEq for LinMapScalar<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.n == other.n && self.alpha == other.alpha
    }
}

//

#[test]
fn test_linmap_diag1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let d = LinMapDiag::<L>::new(vec![1., -2., 4.]);
    let y = &mut[1.; 3];
    d.op(2., &[1., 1., 1.], 1., y);
    assert_float_eq!(y.as_ref(), [3., -3., 9.].as_ref(), abs_all <= 1e-9);

    let d_inv = d.inverse(1e-12).unwrap();
    assert_float_eq!(d.mult(&d_inv).diag(), [1., 1., 1.].as_ref(), abs_all <= 1e-9);

    assert_eq!(LinMapDiag::<L>::new(vec![1., 0.]).inverse(1e-12), Err(LinMapError::Singular));
}

#[test]
fn test_linmap_scalar1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let s = LinMapScalar::<L>::new(2, 4.);
    let y = &mut[0.; 2];
    s.inverse(1e-12).unwrap().op(1., &[2., 8.], 0., y);
    assert_float_eq!(y.as_ref(), [0.5, 2.].as_ref(), abs_all <= 1e-9);

    let y = &mut[f64::NAN; 2];
    s.op(0.5, &[1., -3.], 0., y);
    assert_float_eq!(y.as_ref(), [2., -6.].as_ref(), abs_all <= 1e-9);

    let y = &mut[1.; 2];
    s.op(1., &[1., -3.], 2., y);
    assert_float_eq!(y.as_ref(), [6., -10.].as_ref(), abs_all <= 1e-9);

    assert_eq!(s.as_dense(), vec![4., 0., 0., 4.]);
    assert_eq!(LinMapScalar::<L>::new(2, 0.).inverse(1e-12), Err(LinMapError::Singular));
}
