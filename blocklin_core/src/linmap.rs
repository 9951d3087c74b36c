//! Linear map

use num_traits::{Float, Zero, One};
use alloc::sync::Arc;
use alloc::vec::Vec;
use alloc::vec;
use core::fmt::{Display, LowerExp};
use core::ops::{Add, Sub, Mul, Neg};
use crate::{LinAlgEx, Operator, LinMapError};
use crate::{ImplType, LinOp, compute_type};
use crate::{LinMapDense, LinMapDiag, LinMapScalar, LinMapKron};

//

/// Representations a [`LinearMap`] holds.
#[derive(Debug, Clone)]
pub enum LinMapImpl<L: LinAlgEx>
{
    Dense(LinMapDense<L>),
    Kron(LinMapKron<L>),
    Diag(LinMapDiag<L>),
    Scalar(LinMapScalar<L>),
}

impl<L: LinAlgEx> LinMapImpl<L>
{
    /// Tag of the representation.
    pub fn impl_type(&self) -> ImplType
    {
        match self {
            LinMapImpl::Dense(_) => ImplType::Dense,
            LinMapImpl::Kron(_) => ImplType::Kron,
            LinMapImpl::Diag(_) => ImplType::Diag,
            LinMapImpl::Scalar(_) => ImplType::Scalar,
        }
    }

    fn operator(&self) -> &dyn Operator<L>
    {
        match self {
            LinMapImpl::Dense(d) => d,
            LinMapImpl::Kron(k) => k,
            LinMapImpl::Diag(d) => d,
            LinMapImpl::Scalar(s) => s,
        }
    }
}

//

/// Linear map
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Handle to a linear operator \\(K \in \mathbb{R}^{m \times n}\\) held in one of the [`LinMapImpl`] representations.
/// Cloning shares the representation, which is never mutated;
/// every operation creates a new [`LinearMap`].
///
/// Arithmetic between maps picks the representation of its result by [`compute_type`],
/// so that e.g. a product of two diagonal maps stays diagonal.
/// Dimension mismatches are treated as bugs of the caller and panic.
#[derive(Debug, Clone)]
pub struct LinearMap<L: LinAlgEx>
{
    imp: Arc<LinMapImpl<L>>,
}

impl<L: LinAlgEx> LinearMap<L>
{
    /// Creates a dense map.
    ///
    /// * `n_row` is a number of rows.
    /// * `n_col` is a number of columns.
    /// * `array` is column-major matrix data whose length shall be `n_row * n_col`.
    pub fn dense(n_row: usize, n_col: usize, array: Vec<L::F>) -> Self
    {
        Self::from(LinMapDense::new(n_row, n_col, array))
    }

    /// Creates a diagonal map \\({\bf diag}(d)\\).
    pub fn diag(diag: Vec<L::F>) -> Self
    {
        Self::from(LinMapDiag::new(diag))
    }

    /// Creates a scalar map \\(\alpha I_n\\).
    pub fn scalar(n: usize, alpha: L::F) -> Self
    {
        Self::from(LinMapScalar::new(n, alpha))
    }

    /// Creates an identity map \\(I_n\\).
    pub fn identity(n: usize) -> Self
    {
        Self::scalar(n, L::F::one())
    }

    /// Creates a Kronecker product \\(A \otimes B\\).
    pub fn kron(a: LinearMap<L>, b: LinearMap<L>) -> Self
    {
        Self::from(LinMapKron::new(a, b))
    }

    /// Representation held.
    pub fn as_impl(&self) -> &LinMapImpl<L>
    {
        &self.imp
    }

    /// Tag of the representation held.
    pub fn impl_type(&self) -> ImplType
    {
        self.imp.impl_type()
    }

    /// Number of rows \\(m\\).
    pub fn m(&self) -> usize
    {
        self.size().0
    }

    /// Number of columns \\(n\\).
    pub fn n(&self) -> usize
    {
        self.size().1
    }

    /// Calculates \\(K x\\).
    ///
    /// Returns a newly allocated vector of length \\(m\\).
    /// * `x` is a vector \\(x\\) of length \\(n\\).
    pub fn apply(&self, x: &[L::F]) -> Vec<L::F>
    {
        let (m, n) = self.size();
        assert_eq!(x.len(), n);

        let mut y = vec![L::F::zero(); m];
        self.op(L::F::one(), x, L::F::zero(), &mut y);
        y
    }

    /// Materializes \\(K\\).
    ///
    /// Returns column-major `m * n` data.
    /// Meant for small maps and debugging, as composite representations lose their structure.
    pub fn as_dense(&self) -> Vec<L::F>
    {
        match self.as_impl() {
            LinMapImpl::Dense(d) => d.as_dense(),
            LinMapImpl::Kron(k) => k.as_dense(),
            LinMapImpl::Diag(d) => d.as_dense(),
            LinMapImpl::Scalar(s) => s.as_dense(),
        }
    }

    /// Transposed map \\(K^T\\).
    pub fn transpose(&self) -> Self
    {
        match self.as_impl() {
            LinMapImpl::Dense(d) => Self::from(d.transpose()),
            LinMapImpl::Kron(k) => Self::from(k.transpose()),
            LinMapImpl::Diag(_) | LinMapImpl::Scalar(_) => self.clone(),
        }
    }

    /// Inverse map \\(K^{-1}\\).
    ///
    /// A dense map is assumed to be symmetric and inverted through \\(L D L^T\\) decomposition.
    ///
    /// Returns [`LinMapError::NotSquare`] if \\(m \ne n\\),
    /// or [`LinMapError::Singular`] if found not invertible.
    /// * `eps_zero` is a tolerance of zero pivots or diagonals.
    pub fn inverse(&self, eps_zero: L::F) -> Result<Self, LinMapError>
    {
        let (m, n) = self.size();
        if m != n {
            log::error!("inverting non-square {} x {}", m, n);
            return Err(LinMapError::NotSquare(m, n));
        }

        let inv = match self.as_impl() {
            LinMapImpl::Dense(d) => d.inverse(eps_zero).map(Self::from),
            LinMapImpl::Kron(k) => k.inverse(eps_zero).map(Self::from),
            LinMapImpl::Diag(d) => d.inverse(eps_zero).map(Self::from),
            LinMapImpl::Scalar(s) => s.inverse(eps_zero).map(Self::from),
        }.map_err(|err| {
            log::error!("inverting {:?} {} x {}: {}", self.impl_type(), m, n, err);
            err
        })?;
        debug_assert_eq!(inv.impl_type(), compute_type(LinOp::Inverse, self.impl_type(), self.impl_type()));

        Ok(inv)
    }

    /// Map scaled by \\(\alpha\\).
    pub fn scale(&self, alpha: L::F) -> Self
    {
        match self.as_impl() {
            LinMapImpl::Dense(d) => Self::from(d.scale(alpha)),
            LinMapImpl::Kron(k) => Self::from(k.scale(alpha)),
            LinMapImpl::Diag(d) => Self::from(d.scale(alpha)),
            LinMapImpl::Scalar(s) => Self::from(s.scale(alpha)),
        }
    }

    fn to_diag(&self) -> Option<LinMapDiag<L>>
    {
        match self.as_impl() {
            LinMapImpl::Diag(d) => Some(d.clone()),
            LinMapImpl::Scalar(s) => Some(s.to_diag()),
            _ => None,
        }
    }

    fn multiply(&self, rhs: &Self) -> Self
    {
        let (m, k) = self.size();
        let (k_, n) = rhs.size();
        assert_eq!(k, k_, "multiplying {} x {} by {} x {}", m, k, k_, n);

        let typ = compute_type(LinOp::Multiply, self.impl_type(), rhs.impl_type());

        let c = match (typ, self.as_impl(), rhs.as_impl()) {
            (_, LinMapImpl::Scalar(s), _) => rhs.scale(s.alpha()),
            (_, _, LinMapImpl::Scalar(s)) => self.scale(s.alpha()),
            (ImplType::Diag, LinMapImpl::Diag(a), LinMapImpl::Diag(b)) => Self::from(a.mult(b)),
            (ImplType::Kron, LinMapImpl::Kron(a), LinMapImpl::Kron(b)) if a.chains(b) => Self::from(a.mult(b)),
            _ => self.dense_product(rhs),
        };
        debug_assert!(c.impl_type() == typ || c.impl_type() == ImplType::Dense);

        c
    }

    fn dense_product(&self, rhs: &Self) -> Self
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        let (m, k) = self.size();
        let (_, n) = rhs.size();
        let mut c = vec![f0; m * n];

        if m > 0 && n > 0 && k > 0 {
            match (self.as_impl(), rhs.as_impl()) {
                (LinMapImpl::Dense(a), LinMapImpl::Dense(b)) => {
                    a.mult(b, &mut c);
                },
                (_, LinMapImpl::Kron(_)) => {
                    // C^T = rhs^T self^T, column by column
                    let self_t = self.transpose().as_dense();
                    let mut c_t = vec![f0; n * m];
                    for (a_r, c_r) in self_t.chunks_exact(k).zip(c_t.chunks_exact_mut(n)) {
                        rhs.trans_op(f1, a_r, f0, c_r);
                    }
                    L::transpose_ge(n, m, &c_t, &mut c);
                },
                _ => {
                    let b = rhs.as_dense();
                    for (b_c, c_c) in b.chunks_exact(k).zip(c.chunks_exact_mut(m)) {
                        self.op(f1, b_c, f0, c_c);
                    }
                },
            }
        }

        Self::dense(m, n, c)
    }

    fn addition(&self, rhs: &Self) -> Self
    {
        assert_eq!(self.size(), rhs.size(), "adding {:?} to {:?}", rhs.size(), self.size());

        let typ = compute_type(LinOp::Add, self.impl_type(), rhs.impl_type());

        let c = match (typ, self.as_impl(), rhs.as_impl()) {
            (ImplType::Scalar, LinMapImpl::Scalar(a), LinMapImpl::Scalar(b)) => {
                Self::scalar(self.m(), a.alpha() + b.alpha())
            },
            _ => match (typ, self.to_diag(), rhs.to_diag()) {
                (ImplType::Diag, Some(a), Some(b)) => Self::from(a.add(&b)),
                _ => {
                    let (m, n) = self.size();
                    let mut c = self.as_dense();
                    L::add(L::F::one(), &rhs.as_dense(), &mut c);
                    Self::dense(m, n, c)
                },
            },
        };
        debug_assert_eq!(c.impl_type(), typ);

        c
    }
}

//

impl<L: LinAlgEx> Operator<L> for LinearMap<L>
{
    fn size(&self) -> (usize, usize)
    {
        self.imp.operator().size()
    }

    fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        self.imp.operator().op(alpha, x, beta, y);
    }

    fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        self.imp.operator().trans_op(alpha, x, beta, y);
    }
}

//

impl<L: LinAlgEx> From<LinMapDense<L>> for LinearMap<L>
{
    fn from(d: LinMapDense<L>) -> Self
    {
        LinearMap {
            imp: Arc::new(LinMapImpl::Dense(d)),
        }
    }
}

impl<L: LinAlgEx> From<LinMapKron<L>> for LinearMap<L>
{
    fn from(k: LinMapKron<L>) -> Self
    {
        LinearMap {
            imp: Arc::new(LinMapImpl::Kron(k)),
        }
    }
}

impl<L: LinAlgEx> From<LinMapDiag<L>> for LinearMap<L>
{
    fn from(d: LinMapDiag<L>) -> Self
    {
        LinearMap {
            imp: Arc::new(LinMapImpl::Diag(d)),
        }
    }
}

impl<L: LinAlgEx> From<LinMapScalar<L>> for LinearMap<L>
{
    fn from(s: LinMapScalar<L>) -> Self
    {
        LinearMap {
            imp: Arc::new(LinMapImpl::Scalar(s)),
        }
    }
}

//

impl<L: LinAlgEx> PartialEq for LinearMap<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        if Arc::ptr_eq(&self.imp, &other.imp) {
            return true;
        }

        match (self.as_impl(), other.as_impl()) {
            (LinMapImpl::Dense(a), LinMapImpl::Dense(b)) => a == b,
            (LinMapImpl::Kron(a), LinMapImpl::Kron(b)) => a == b,
            (LinMapImpl::Diag(a), LinMapImpl::Diag(b)) => a == b,
            (LinMapImpl::Scalar(a), LinMapImpl::Scalar(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a, L: LinAlgEx> Mul for &'a LinearMap<L>
{
    type Output = LinearMap<L>;

    fn mul(self, rhs: Self) -> LinearMap<L>
    {
        self.multiply(rhs)
    }
}

impl<'a, L: LinAlgEx> Add for &'a LinearMap<L>
{
    type Output = LinearMap<L>;

    fn add(self, rhs: Self) -> LinearMap<L>
    {
        self.addition(rhs)
    }
}

impl<'a, L: LinAlgEx> Neg for &'a LinearMap<L>
{
    type Output = LinearMap<L>;

    fn neg(self) -> LinearMap<L>
    {
        self.scale(-L::F::one())
    }
}

impl<'a, L: LinAlgEx> Sub for &'a LinearMap<L>
{
    type Output = LinearMap<L>;

    fn sub(self, rhs: Self) -> LinearMap<L>
    {
        self.addition(&-rhs)
    }
}

//

impl<L: LinAlgEx> Display for LinearMap<L>
where L::F: Float + LowerExp
{
    fn fmt(&self, f: &mut core::fmt::Formatter) -> Result<(), core::fmt::Error>
    {
        let (nr, nc) = self.size();

        match self.as_impl() {
            LinMapImpl::Dense(d) => {
                if nr == 0 || nc == 0 {
                    write!(f, "[ ]")?;
                }
                else {
                    let array = d.as_dense();
                    write!(f, "[ {:.3e}", array[0])?;
                    if nc > 1 {
                        write!(f, " ... {:.3e}", array[(nc - 1) * nr])?;
                    }
                    if nr > 1 {
                        write!(f, " ... {:.3e}", array[nr - 1])?;
                        if nc > 1 {
                            write!(f, " ... {:.3e}", array[nr * nc - 1])?;
                        }
                    }
                    write!(f, " ]")?;
                }
            },
            LinMapImpl::Kron(k) => {
                write!(f, "( {} ) (x) ( {} )", k.a(), k.b())?;
            },
            LinMapImpl::Diag(d) => {
                match d.diag() {
                    [] => write!(f, "diag[ ]")?,
                    [d0] => write!(f, "diag[ {:.3e} ]", d0)?,
                    [d0, .., dn] => write!(f, "diag[ {:.3e} ... {:.3e} ]", d0, dn)?,
                }
            },
            LinMapImpl::Scalar(s) => {
                write!(f, "{:.3e} I", s.alpha())?;
            },
        }

        write!(f, " ({} x {}) {:?}", nr, nc, self.impl_type())
    }
}

//

#[test]
fn test_linmap1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let maps = [
        LM::dense(3, 2, vec![1., 2., 3., 4., 5., 6.]),
        LM::dense(2, 3, vec![1., 2., 3., 4., 5., 6.]).transpose(),
        LM::diag(vec![2., -1., 0.5]),
        LM::scalar(3, -3.),
        LM::kron(LM::dense(1, 2, vec![1., 2.]), LM::diag(vec![1., 2., 3.])),
    ];

    for k in maps.iter() {
        let (m, n) = k.size();
        let x: Vec<f64> = (0.. n).map(|i| 1. + i as f64).collect();
        let mut y_ref = vec![0.; m];
        L::transform_ge(false, m, n, 1., &k.as_dense(), &x, 0., &mut y_ref);

        assert_float_eq!(k.apply(&x).as_slice(), y_ref.as_slice(), abs_all <= 1e-9);
        assert!(k.transpose().transpose() == *k);
        assert_eq!(k.transpose().size(), (n, m));
    }
}

#[test]
fn test_linmap_arith1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let d = LM::diag(vec![1., 2.]);
    let s = LM::scalar(2, 3.);
    let g = LM::dense(2, 2, vec![1., 2., 3., 4.]);
    let k = LM::kron(LM::identity(1), g.clone());

    assert_eq!((&d * &d).impl_type(), ImplType::Diag);
    assert_eq!((&s * &s).impl_type(), ImplType::Scalar);
    assert_eq!((&s + &d).impl_type(), ImplType::Diag);
    assert_eq!((&s * &k).impl_type(), ImplType::Kron);
    assert_eq!((&k * &k).impl_type(), ImplType::Kron);
    assert_eq!((&k * &d).impl_type(), ImplType::Dense);
    assert_eq!((&g + &d).impl_type(), ImplType::Dense);

    assert_eq!((&s + &d).as_dense(), vec![4., 0., 0., 5.]);
    assert_eq!((&g - &g).as_dense(), vec![0.; 4]);
    assert_eq!((&k * &k).as_dense(), (&g * &g).as_dense());
    assert_eq!((&d * &k).as_dense(), (&d * &g).as_dense());
    assert_eq!((&k * &d).as_dense(), (&g * &d).as_dense());

    // dense product: [1 3; 2 4] [1 3; 2 4]
    assert_float_eq!((&g * &g).as_dense().as_slice(), [7., 10., 15., 22.].as_ref(), abs_all <= 1e-9);
}

#[test]
fn test_linmap_inverse1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let sym = LM::dense(2, 2, vec![2., 1., 1., 3.]);
    let maps = [
        sym.clone(),
        LM::diag(vec![2., -4.]),
        LM::scalar(2, 0.5),
        LM::kron(sym.clone(), LM::diag(vec![1., 2.])),
    ];

    for k in maps.iter() {
        let k_inv = k.inverse(1e-12).unwrap();
        assert_eq!(k_inv.impl_type(), k.impl_type());

        let x: Vec<f64> = (0.. k.n()).map(|i| 1. - i as f64).collect();
        assert_float_eq!(k.apply(&k_inv.apply(&x)).as_slice(), x.as_slice(), abs_all <= 1e-9);
    }

    assert_eq!(LM::dense(1, 2, vec![1., 2.]).inverse(1e-12), Err(LinMapError::NotSquare(1, 2)));
    assert_eq!(LM::dense(2, 2, vec![1., 1., 1., 1.]).inverse(1e-12), Err(LinMapError::Singular));
    assert_eq!(
        LM::kron(LM::dense(1, 2, vec![1., 2.]), LM::dense(2, 1, vec![1., 2.])).inverse(1e-12),
        Err(LinMapError::Singular)
    );
}
