use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, LowerExp};
use std::ops::{Add, Sub, Mul, Neg};
use num_traits::{Float, One};
use blocklin_core::{LinAlgEx, LinearMap, Operator};
use crate::{BlockVector, BlockError};

//

/// Block matrix
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// [`LinearMap`] blocks \\(A_{ij}\\) keyed by a row key \\(i\\) and a column key \\(j\\).
/// Absent blocks are structural zeros.
///
/// Blocks are stored column by column.
/// All the blocks in a column shall have the same number of columns,
/// which is asserted on insertion.
#[derive(Debug, Clone)]
pub struct BlockMatrix<L: LinAlgEx>
{
    data: BTreeMap<String, BTreeMap<String, LinearMap<L>>>,
}

impl<L: LinAlgEx> BlockMatrix<L>
{
    /// Creates an empty instance.
    pub fn new() -> Self
    {
        BlockMatrix {
            data: BTreeMap::new(),
        }
    }

    /// Block-diagonal identity.
    ///
    /// * `keys` iterates pairs of a block key and its dimension.
    pub fn identity<'a, I>(keys: I) -> Self
    where I: IntoIterator<Item=(&'a str, usize)>
    {
        let mut c = BlockMatrix::new();
        for (k, dim) in keys {
            c.insert_or_add(k, k, LinearMap::identity(dim));
        }
        c
    }

    /// Identity \\(I\\) such that \\(I A = A\\).
    pub fn left_identity(&self) -> Self
    {
        let mut dims = BTreeMap::new();
        for (r, _, a) in self.iter() {
            dims.entry(r).or_insert(a.m());
        }
        Self::identity(dims)
    }

    /// Identity \\(I\\) such that \\(A I = A\\).
    pub fn right_identity(&self) -> Self
    {
        let dims = self.data.iter()
            .filter_map(|(c, col)| col.values().next().map(|a| (c.as_str(), a.n())));
        Self::identity(dims)
    }

    /// Inserts a block, or adds it to the existing one of the same keys.
    ///
    /// * `row` is a row key.
    /// * `col` is a column key.
    /// * `value` is a block, whose number of columns shall agree with the other blocks in `col`.
    pub fn insert_or_add(&mut self, row: &str, col: &str, value: LinearMap<L>)
    {
        let column = self.data.entry(col.to_string()).or_default();

        if let Some(a) = column.values().next() {
            assert_eq!(a.n(), value.n(), "inserting {} columns to {} of {}", value.n(), col, a.n());
        }

        match column.get_mut(row) {
            Some(a) => {
                *a = &*a + &value;
            },
            None => {
                column.insert(row.to_string(), value);
            },
        }
    }

    /// Builder pattern of [`BlockMatrix::insert_or_add`].
    pub fn with(mut self, row: &str, col: &str, value: LinearMap<L>) -> Self
    {
        self.insert_or_add(row, col, value);
        self
    }

    pub fn get(&self, row: &str, col: &str) -> Option<&LinearMap<L>>
    {
        self.data.get(col).and_then(|column| column.get(row))
    }

    pub fn has_key(&self, row: &str, col: &str) -> bool
    {
        self.get(row, col).is_some()
    }

    /// Removes a block.
    ///
    /// A column left with no block is removed as well.
    /// Returns the removed block if it existed.
    pub fn remove(&mut self, row: &str, col: &str) -> Option<LinearMap<L>>
    {
        let column = self.data.get_mut(col)?;
        let a = column.remove(row)?;

        if column.is_empty() {
            self.data.remove(col);
        }

        Some(a)
    }

    /// Blocks of a column, keyed by row keys.
    pub fn col(&self, col: &str) -> Option<&BTreeMap<String, LinearMap<L>>>
    {
        self.data.get(col)
    }

    /// Iterates blocks as tuples of a row key, a column key and a block, column by column.
    pub fn iter(&self) -> impl Iterator<Item=(&str, &str, &LinearMap<L>)>
    {
        self.data.iter().flat_map(|(c, column)| {
            column.iter().map(move |(r, a)| (r.as_str(), c.as_str(), a))
        })
    }

    pub fn row_keys(&self) -> BTreeSet<&str>
    {
        self.data.values().flat_map(|column| column.keys().map(|r| r.as_str())).collect()
    }

    pub fn col_keys(&self) -> BTreeSet<&str>
    {
        self.data.keys().map(|c| c.as_str()).collect()
    }

    /// Number of rows, summed over distinct row keys.
    pub fn m(&self) -> usize
    {
        let mut seen = BTreeSet::new();
        let mut m = 0;
        for (r, _, a) in self.iter() {
            if seen.insert(r) {
                m += a.m();
            }
        }
        m
    }

    /// Number of columns, summed over column keys.
    pub fn n(&self) -> usize
    {
        self.data.values()
            .filter_map(|column| column.values().next())
            .map(|a| a.n())
            .sum()
    }

    pub fn is_empty(&self) -> bool
    {
        self.data.is_empty()
    }

    /// Matrix scaled by \\(\alpha\\).
    pub fn scale(&self, alpha: L::F) -> Self
    {
        let mut c = BlockMatrix::new();
        for (r, col, a) in self.iter() {
            c.insert_or_add(r, col, a.scale(alpha));
        }
        c
    }

    /// Transposed matrix \\(A^T\\), whose \\((j, i)\\) block is \\(A_{ij}^T\\).
    pub fn transpose(&self) -> Self
    {
        let mut c = BlockMatrix::new();
        for (r, col, a) in self.iter() {
            c.insert_or_add(col, r, a.transpose());
        }
        c
    }

    /// Inverse of a block-diagonal matrix.
    ///
    /// Block-diagonal means that each column has exactly one block and no two columns share a row key.
    /// The inverse places \\(A_{ij}^{-1}\\) at \\((j, i)\\).
    ///
    /// Returns [`BlockError::NotSquare`], [`BlockError::NotBlockDiagonal`],
    /// or [`BlockError::LinMap`] if any block fails to be inverted.
    /// * `eps_zero` is a tolerance of zero pivots or diagonals.
    pub fn inverse(&self, eps_zero: L::F) -> Result<Self, BlockError>
    {
        let (m, n) = (self.m(), self.n());
        if m != n {
            log::error!("inverting non-square block matrix {} x {}", m, n);
            return Err(BlockError::NotSquare(m, n));
        }

        let mut seen = BTreeSet::new();
        for column in self.data.values() {
            let mut rows = column.keys();
            let single = match (rows.next(), rows.next()) {
                (Some(r), None) => seen.insert(r),
                _ => false,
            };
            if !single {
                log::error!("inverting block matrix which is not block diagonal");
                return Err(BlockError::NotBlockDiagonal);
            }
        }

        let mut c = BlockMatrix::new();
        for (r, col, a) in self.iter() {
            c.insert_or_add(col, r, a.inverse(eps_zero)?);
        }
        Ok(c)
    }

    fn product(&self, rhs: &Self) -> Self
    {
        let mut c = BlockMatrix::new();

        for (k, j, b) in rhs.iter() {
            if let Some(column) = self.data.get(k) {
                for (i, a) in column.iter() {
                    log::trace!("C({}, {}) += A({}, {}) {:?} * B({}, {}) {:?}", i, j, i, k, a.size(), k, j, b.size());
                    c.insert_or_add(i, j, a * b);
                }
            }
        }

        c
    }

    fn sum(&self, alpha: L::F, rhs: &Self) -> Self
    {
        let mut c = self.clone();
        for (r, col, b) in rhs.iter() {
            c.insert_or_add(r, col, b.scale(alpha));
        }
        c
    }
}

impl<L: LinAlgEx> Default for BlockMatrix<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

//

impl<L: LinAlgEx> PartialEq for BlockMatrix<L>
{
    fn eq(&self, other: &Self) -> bool
    {
        self.data == other.data
    }
}

impl<'a, L: LinAlgEx> Mul<&'a BlockVector<L>> for &'a BlockMatrix<L>
{
    type Output = BlockVector<L>;

    /// Absent columns of the matrix contribute nothing.
    fn mul(self, x: &'a BlockVector<L>) -> BlockVector<L>
    {
        log::trace!("block matrix-vector product");

        let mut y = BlockVector::new();
        for (k, x_k) in x.iter() {
            if let Some(column) = self.data.get(k) {
                for (r, a) in column.iter() {
                    y.insert_or_add(r, a.apply(x_k));
                }
            }
        }
        y
    }
}

impl<'a, L: LinAlgEx> Mul for &'a BlockMatrix<L>
{
    type Output = BlockMatrix<L>;

    fn mul(self, rhs: Self) -> BlockMatrix<L>
    {
        self.product(rhs)
    }
}

impl<'a, L: LinAlgEx> Add for &'a BlockMatrix<L>
{
    type Output = BlockMatrix<L>;

    fn add(self, rhs: Self) -> BlockMatrix<L>
    {
        self.sum(L::F::one(), rhs)
    }
}

impl<'a, L: LinAlgEx> Sub for &'a BlockMatrix<L>
{
    type Output = BlockMatrix<L>;

    fn sub(self, rhs: Self) -> BlockMatrix<L>
    {
        self.sum(-L::F::one(), rhs)
    }
}

impl<'a, L: LinAlgEx> Neg for &'a BlockMatrix<L>
{
    type Output = BlockMatrix<L>;

    fn neg(self) -> BlockMatrix<L>
    {
        self.scale(-L::F::one())
    }
}

//

impl<L: LinAlgEx> Display for BlockMatrix<L>
where L::F: Float + LowerExp
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error>
    {
        write!(f, "block matrix {} x {}", self.m(), self.n())?;
        for (r, c, a) in self.iter() {
            writeln!(f)?;
            write!(f, "({}, {}) {}", r, c, a)?;
        }
        Ok(())
    }
}

//

#[test]
fn test_block_matrix1()
{
    use blocklin_core::{FloatGeneric, ImplType};

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let mut a = BlockMatrix::<L>::new();
    a.insert_or_add("x", "x", LM::scalar(2, 1.));
    a.insert_or_add("x", "x", LM::diag(vec![1., 2.]));
    a.insert_or_add("y", "x", LM::dense(1, 2, vec![1., 1.]));
    a.insert_or_add("x", "y", LM::dense(2, 3, vec![0.; 6]));

    assert_eq!(a.get("x", "x").map(|b| b.impl_type()), Some(ImplType::Diag));
    assert_eq!(a.get("x", "x").map(|b| b.as_dense()), Some(vec![2., 0., 0., 3.]));
    assert_eq!((a.m(), a.n()), (3, 5));
    assert_eq!(a.row_keys().into_iter().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(a.col_keys().into_iter().collect::<Vec<_>>(), vec!["x", "y"]);

    let at = a.transpose();
    assert_eq!((at.m(), at.n()), (5, 3));
    assert_eq!(at.get("x", "y").map(|b| b.size()), Some((2, 1)));
    assert_eq!(at.get("y", "x").map(|b| b.size()), Some((3, 2)));

    assert!(a.remove("x", "y").is_some());
    assert!(a.col("y").is_none());
    assert!(a.remove("x", "y").is_none());

    let s = format!("{}", a);
    assert!(s.starts_with("block matrix 3 x 2"));
}

#[test]
#[should_panic]
fn test_block_matrix_col_mismatch()
{
    use blocklin_core::FloatGeneric;

    type L = FloatGeneric<f64>;

    let mut a = BlockMatrix::<L>::new();
    a.insert_or_add("x", "x", LinearMap::identity(2));
    a.insert_or_add("y", "x", LinearMap::identity(3));
}

#[test]
fn test_block_matrix_inverse1()
{
    use float_eq::assert_float_eq;
    use blocklin_core::FloatGeneric;

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    // permuted block diagonal: x -> y, y -> x
    let a = BlockMatrix::<L>::new()
        .with("y", "x", LM::diag(vec![2., 4.]))
        .with("x", "y", LM::dense(2, 2, vec![2., 1., 1., 2.]));
    let a_inv = a.inverse(1e-12).unwrap();
    assert!(a_inv.has_key("x", "y"));
    assert!(a_inv.has_key("y", "x"));

    let x = BlockVector::new().with("x", vec![1., -1.]).with("y", vec![3., 0.5]);
    let z = &a * &(&a_inv * &x);
    for (k, v) in x.iter() {
        assert_float_eq!(z.get(k).unwrap(), v.as_slice(), abs_all <= 1e-9);
    }

    let b = a.clone().with("x", "x", LM::identity(2));
    assert_eq!(b.inverse(1e-12), Err(BlockError::NotBlockDiagonal));

    let c = BlockMatrix::<L>::new()
        .with("x", "x", LM::identity(2))
        .with("x", "y", LM::identity(2));
    assert_eq!(c.inverse(1e-12), Err(BlockError::NotSquare(2, 4)));

    let d = BlockMatrix::<L>::new().with("x", "x", LM::scalar(2, 0.));
    assert_eq!(d.inverse(1e-12), Err(BlockError::LinMap(blocklin_core::LinMapError::Singular)));
}

#[test]
fn test_block_matrix_identity1()
{
    use blocklin_core::FloatGeneric;

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let a = BlockMatrix::<L>::new()
        .with("u", "x", LM::dense(3, 2, vec![1., 2., 3., 4., 5., 6.]))
        .with("v", "x", LM::dense(1, 2, vec![1., 1.]))
        .with("v", "y", LM::scalar(1, 7.));

    let li = a.left_identity();
    let ri = a.right_identity();
    assert_eq!((li.m(), li.n()), (a.m(), a.m()));
    assert_eq!((ri.m(), ri.n()), (a.n(), a.n()));
    assert_eq!(&li * &a, a);
    assert_eq!(&a * &ri, a);
}
