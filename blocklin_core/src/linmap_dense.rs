use num_traits::{Zero, One};
use alloc::sync::Arc;
use alloc::vec::Vec;
use alloc::vec;
use crate::{LinAlgEx, Operator, LinMapError};

//

/// Dense matrix representation
///
/// Owns a column-major data array shared among its transposes.
/// [`LinMapDense::transpose`] only flips a flag and never copies the array.
#[derive(Debug, Clone)]
pub struct LinMapDense<L: LinAlgEx>
{
    n_row: usize,
    n_col: usize,
    array: Arc<Vec<L::F>>,
    trans: bool,
}

impl<L: LinAlgEx> LinMapDense<L>
{
    /// Creates an instance.
    ///
    /// Returns [`LinMapDense`] instance.
    /// * `n_row` is a number of rows.
    /// * `n_col` is a number of columns.
    /// * `array` is column-major matrix data whose length shall be `n_row * n_col`.
    pub fn new(n_row: usize, n_col: usize, array: Vec<L::F>) -> Self
    {
        assert_eq!(n_row * n_col, array.len());

        LinMapDense {
            n_row,
            n_col,
            array: Arc::new(array),
            trans: false,
        }
    }

    /// Transposed matrix sharing the same data array.
    pub fn transpose(&self) -> Self
    {
        LinMapDense {
            n_row: self.n_row,
            n_col: self.n_col,
            array: self.array.clone(),
            trans: !self.trans,
        }
    }

    /// Materialized column-major data of the `m` x `n` matrix.
    pub fn as_dense(&self) -> Vec<L::F>
    {
        if self.trans {
            let mut t = vec![L::F::zero(); self.array.len()];
            L::transpose_ge(self.n_row, self.n_col, &self.array, &mut t);
            t
        }
        else {
            self.array.to_vec()
        }
    }

    /// Matrix scaled by `alpha` in a newly allocated array.
    pub fn scale(&self, alpha: L::F) -> Self
    {
        let mut array = self.array.to_vec();
        L::scale(alpha, &mut array);

        LinMapDense {
            n_row: self.n_row,
            n_col: self.n_col,
            array: Arc::new(array),
            trans: self.trans,
        }
    }

    /// Inverse matrix, assuming the matrix is symmetric.
    ///
    /// Only the lower triangle of the stored data is read and the upper triangle is ignored,
    /// so a non-symmetric matrix gives a wrong inverse without an error.
    /// * `eps_zero` is a tolerance of pivots, see [`LinAlgEx::inv_sy`].
    pub fn inverse(&self, eps_zero: L::F) -> Result<Self, LinMapError>
    {
        let (m, n) = self.size();
        if m != n {
            return Err(LinMapError::NotSquare(m, n));
        }

        log::debug!("factoring {} x {}", m, n);

        // symmetric, so the flag does not matter
        let mut inv = self.array.to_vec();
        let mut work = vec![L::F::zero(); L::inv_sy_worklen(n)];

        L::inv_sy(n, &mut inv, eps_zero, &mut work).map_err(|_| LinMapError::Singular)?;

        Ok(LinMapDense::new(n, n, inv))
    }

    /// Calculates the product with `rhs` into `c`,
    /// a `m` x `n` column-major array where `m` is of `self` and `n` is of `rhs`.
    pub fn mult(&self, rhs: &Self, c: &mut[L::F])
    {
        let (m, k) = self.size();
        let (k_, n) = rhs.size();
        assert_eq!(k, k_);

        if m > 0 && n > 0 && k > 0 {
            L::mult_ge(self.trans, rhs.trans, m, n, k,
                L::F::one(), &self.array, &rhs.array, L::F::zero(), c);
        }
        else {
            L::scale(L::F::zero(), c);
        }
    }

    fn op_impl(&self, transpose: bool, alpha: L::F, x: &[L::F], beta: L::F, y: &mut[L::F])
    {
        if self.n_row > 0 && self.n_col > 0 {
            L::transform_ge(transpose ^ self.trans, self.n_row, self.n_col, alpha, &self.array, x, beta, y)
        }
        else {
            L::scale(beta, y);
        }
    }
}

impl<L: LinAlgEx> Operator<L> for LinMapDense<L>
{
    fn size(&self) -> (usize, usize)
    {
        if self.trans {
            (self.n_col, self.n_row)
        }
        else {
            (self.n_row, self.n_col)
        }
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

impl<L: LinAlgEx> PartialEq for LinMapDense<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        if self.size() != other.size() {
            false
        }
        else if self.trans == other.trans {
            Arc::ptr_eq(&self.array, &other.array) || self.array == other.array
        }
        else {
            self.as_dense() == other.as_dense()
        }
    }
}

//

#[test]
fn test_linmap_dense1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    let a = LinMapDense::<L>::new(2, 3, vec![ // column-major
        1., 4.,
        2., 5.,
        3., 6.,
    ]);
    let at = a.transpose();
    assert_eq!(at.size(), (3, 2));
    assert_eq!(at.as_dense(), vec![1., 2., 3., 4., 5., 6.]);
    assert!(at.transpose() == a);
    assert!(a.scale(2.).scale(0.5) == a);
    assert!(LinMapDense::<L>::new(3, 2, vec![1., 2., 3., 4., 5., 6.]) == at);
    assert!(at != a);

    let y = &mut[0.; 3];
    at.op(1., &[1., 1.], 0., y);
    assert_float_eq!(y.as_ref(), [5., 7., 9.].as_ref(), abs_all <= 1e-9);

    let c = &mut[0.; 4];
    a.mult(&at, c);
    assert_float_eq!(c.as_ref(), [14., 32., 32., 77.].as_ref(), abs_all <= 1e-9);

    assert_eq!(a.inverse(1e-12), Err(LinMapError::NotSquare(2, 3)));

    // upper triangle 9. is ignored, inverted as [[4, 1], [1, 3]]
    let s = LinMapDense::<L>::new(2, 2, vec![4., 1., 9., 3.]);
    let s_inv = s.inverse(1e-12).unwrap();
    let r: Vec<f64> = [3., -1., -1., 4.].iter().map(|e| e / 11.).collect();
    assert_float_eq!(s_inv.as_dense().as_slice(), r.as_slice(), abs_all <= 1e-9);
}
