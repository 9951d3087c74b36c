use num_traits::{Float, Zero, One};
use blocklin_core::{LinAlgEx, Operator, ImplType, LinOp, compute_type, nonzeros};
use crate::{BlockMatrix, BlockVector, BlockError};

//

/// Rule to choose the next pivot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotOrder
{
    /// Key of the least estimated fill-in. Ties go to the first key in the sorted order.
    MinFill,
    /// First remaining key in the sorted order.
    Natural,
}

/// Factorization parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CholeskyParam<F: Float>
{
    /// Tolerance of zero pivots or diagonals, used when the diagonal blocks are inverted.
    pub eps_zero: F,
    /// Pivot rule.
    pub pivot: PivotOrder,
}

impl<F: Float> Default for CholeskyParam<F>
{
    fn default() -> Self
    {
        let ten = F::from(10).unwrap();

        CholeskyParam {
            eps_zero: ten.powi(-12),
            pivot: PivotOrder::MinFill,
        }
    }
}

//

/// Block Cholesky factorization
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>
///
/// Factors a block-symmetric positive semidefinite [`BlockMatrix`] \\(A\\) into
/// \\[
/// A = (I + L) D (I + L)^T
/// \\]
/// by eliminating one block key at a time, where
/// * \\(L\\) is strictly block lower triangular in the elimination order,
/// * \\(D\\) is block diagonal, which is kept as its inverse \\(D^{-1}\\).
///
/// Both \\(A_{ik}\\) and \\(A_{ki}\\) of \\(A\\) shall be present.
/// Each elimination of a key \\(k\\) with its off-diagonal column \\(V\\) updates
/// \\[
/// \begin{array}{l}
/// L \leftarrow L + V D_k^{-1}, \\\\
/// A \leftarrow A - V D_k^{-1} V^T,
/// \end{array}
/// \\]
/// so the order of keys decides how much new structure the updates create.
/// With [`PivotOrder::MinFill`] the key is chosen greedily by estimating the nonzeros of \\(V D_k^{-1} V^T\\)
/// through [`compute_type`] and [`nonzeros`]; this is a local heuristic, not an optimal ordering.
pub struct BlockCholesky<L: LinAlgEx>
{
    /// factorization parameters.
    pub par: CholeskyParam<L::F>,
}

impl<L: LinAlgEx> BlockCholesky<L>
{
    /// Creates an instance.
    ///
    /// Returns [`BlockCholesky`] instance.
    pub fn new() -> Self
    {
        BlockCholesky {
            par: CholeskyParam::default(),
        }
    }

    /// Changes factorization parameters.
    ///
    /// Returns [`BlockCholesky`] with its parameters changed.
    /// * `f` is a function to change parameters given by its argument.
    pub fn par<P>(mut self, f: P) -> Self
    where P: FnOnce(&mut CholeskyParam<L::F>)
    {
        f(&mut self.par);
        self
    }

    /// Factors a matrix.
    ///
    /// Returns [`CholeskyFactor`], or an error:
    /// * [`BlockError::EmptyPivot`] if no column is left while keys remain to be eliminated,
    /// * [`BlockError::MissingDiagonal`] if a diagonal block is absent,
    /// * [`BlockError::Pivot`] if a diagonal block fails to be inverted.
    ///
    /// * `a` is a matrix \\(A\\), which is left untouched.
    pub fn compute(&self, a: &BlockMatrix<L>) -> Result<CholeskyFactor<L>, BlockError>
    {
        let n_cols = a.col_keys().len();
        log::debug!("factoring {} keys, {} x {}", n_cols, a.m(), a.n());
        log::debug!("{:?}", self.par);

        let mut a = a.clone();
        let mut l = BlockMatrix::new();
        let mut d_inv = BlockMatrix::new();
        let mut order = Vec::with_capacity(n_cols);
        let mut dims = Vec::with_capacity(n_cols);

        for _ in 0.. n_cols {
            let (key, fill) = self.next_key(&a)?;
            log::debug!("eliminating {} (fill {})", key, fill);

            let a_kk = a.get(&key, &key).ok_or_else(|| {
                log::error!("no diagonal block ({}, {})", key, key);
                BlockError::MissingDiagonal(key.clone())
            })?;
            let a_kk_inv = a_kk.inverse(self.par.eps_zero).map_err(|err| {
                log::error!("diagonal block ({}, {}) {}", key, key, err);
                BlockError::Pivot { key: key.clone(), err }
            })?;

            dims.push(a_kk_inv.n());
            let di_inv = BlockMatrix::new().with(&key, &key, a_kk_inv);
            let v = remove_key(&mut a, &key);
            let v_di = &v * &di_inv;

            l = &l + &v_di;
            d_inv = &d_inv + &di_inv;
            a = &a - &(&v_di * &v.transpose());
            order.push(key);
        }

        let lt = l.transpose();
        log::debug!("factored, order {:?}", order);

        Ok(CholeskyFactor {
            order, dims, l, lt, d_inv,
        })
    }

    fn next_key(&self, a: &BlockMatrix<L>) -> Result<(String, usize), BlockError>
    {
        let mut best: Option<(&str, usize)> = None;

        for k in a.col_keys() {
            if self.par.pivot == PivotOrder::Natural {
                best = Some((k, 0));
                break;
            }

            let fill = compute_fill(a, k)?;
            log::trace!("fill of {}: {}", k, fill);

            match best {
                Some((_, best_fill)) if fill >= best_fill => {},
                _ => best = Some((k, fill)),
            }
        }

        match best {
            Some((k, fill)) => Ok((k.to_string(), fill)),
            None => {
                log::error!("no column left to pivot");
                Err(BlockError::EmptyPivot)
            },
        }
    }
}

impl<L: LinAlgEx> Default for BlockCholesky<L>
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// Estimates the nonzeros of \\(V D_k^{-1} V^T\\) by types and numbers of rows of the blocks,
/// where \\(V\\) is the off-diagonal column of `k`.
fn compute_fill<L: LinAlgEx>(a: &BlockMatrix<L>, k: &str) -> Result<usize, BlockError>
{
    let a_kk = a.get(k, k).ok_or_else(|| {
        log::error!("no diagonal block ({}, {})", k, k);
        BlockError::MissingDiagonal(k.to_string())
    })?;

    let col: Vec<(ImplType, usize)> = match a.col(k) {
        Some(col) => col.iter()
            .filter(|(i, _)| i.as_str() != k)
            .map(|(_, a_ik)| (a_ik.impl_type(), a_ik.m()))
            .collect(),
        None => Vec::new(),
    };

    let mut fill = 0;
    for (typ_i, m_i) in col.iter() {
        let typ_ik = compute_type(LinOp::Multiply, *typ_i, a_kk.impl_type());
        for (typ_j, m_j) in col.iter() {
            let typ = compute_type(LinOp::Multiply, typ_ik, *typ_j);
            fill += nonzeros(typ, *m_i, *m_j);
        }
    }

    Ok(fill)
}

/// Removes row and column `key` from `a`.
///
/// Returns the removed column without its diagonal block.
fn remove_key<L: LinAlgEx>(a: &mut BlockMatrix<L>, key: &str) -> BlockMatrix<L>
{
    let rows: Vec<String> = a.col(key)
        .map(|col| col.keys().cloned().collect())
        .unwrap_or_default();

    let mut v = BlockMatrix::new();
    for r in rows.iter() {
        let a_rk = a.remove(r, key);
        if r != key {
            if let Some(a_rk) = a_rk {
                v.insert_or_add(r, key, a_rk);
            }
            a.remove(key, r);
        }
    }
    v
}

//

/// Factors by [`BlockCholesky::compute`].
///
/// Immutable once computed, so [`CholeskyFactor::solve`] may be called repeatedly and from several threads.
#[derive(Debug, Clone)]
pub struct CholeskyFactor<L: LinAlgEx>
{
    order: Vec<String>,
    dims: Vec<usize>,
    l: BlockMatrix<L>,
    lt: BlockMatrix<L>,
    d_inv: BlockMatrix<L>,
}

impl<L: LinAlgEx> CholeskyFactor<L>
{
    /// Elimination order of keys.
    pub fn order(&self) -> &[String]
    {
        &self.order
    }

    /// Strictly lower part \\(L\\).
    pub fn l(&self) -> &BlockMatrix<L>
    {
        &self.l
    }

    /// \\(L^T\\).
    pub fn lt(&self) -> &BlockMatrix<L>
    {
        &self.lt
    }

    /// Block-diagonal \\(D^{-1}\\).
    pub fn d_inv(&self) -> &BlockMatrix<L>
    {
        &self.d_inv
    }

    /// Solves \\(A x = b\\).
    ///
    /// Returns \\(x\\), which holds every eliminated key.
    /// * `b` is a right-hand side \\(b\\). Its keys not eliminated are ignored,
    ///   and eliminated keys absent from it are zeros.
    pub fn solve(&self, b: &BlockVector<L>) -> BlockVector<L>
    {
        let f0 = L::F::zero();
        let f1 = L::F::one();

        let mut x: Vec<Vec<L::F>> = self.order.iter().zip(&self.dims)
            .map(|(k, &dim)| match b.get(k) {
                Some(b_k) => {
                    assert_eq!(b_k.len(), dim, "{} has {} elements, not {}", k, b_k.len(), dim);
                    b_k.to_vec()
                },
                None => vec![f0; dim],
            })
            .collect();

        // (I + L) y = b
        for j in 0.. x.len() {
            for i in j + 1.. x.len() {
                if let Some(l_ij) = self.l.get(&self.order[i], &self.order[j]) {
                    let (x_lo, x_hi) = x.split_at_mut(i);
                    l_ij.op(-f1, &x_lo[j], f1, &mut x_hi[0]);
                }
            }
        }

        // z = D^-1 y
        for (k, x_k) in self.order.iter().zip(x.iter_mut()) {
            if let Some(d_kk) = self.d_inv.get(k, k) {
                *x_k = d_kk.apply(x_k);
            }
        }

        // (I + L^T) x = z
        for j in (0.. x.len()).rev() {
            for i in (0.. j).rev() {
                if let Some(lt_ij) = self.lt.get(&self.order[i], &self.order[j]) {
                    let (x_lo, x_hi) = x.split_at_mut(j);
                    lt_ij.op(-f1, &x_hi[0], f1, &mut x_lo[i]);
                }
            }
        }

        self.order.iter().zip(x).map(|(k, x_k)| (k.as_str(), x_k)).collect()
    }
}

//

#[test]
fn test_block_cholesky_identity()
{
    use blocklin_core::{FloatGeneric, LinearMap};

    type L = FloatGeneric<f64>;

    let _ = env_logger::builder().is_test(true).try_init();

    let a = BlockMatrix::<L>::identity([("x", 2), ("y", 3)]);
    let b = BlockVector::new()
        .with("x", vec![1., 2.])
        .with("y", vec![3., 4., 5.]);

    let f = BlockCholesky::new().compute(&a).unwrap();
    assert_eq!(f.solve(&b), b);
    assert!(f.l().is_empty());

    let a = BlockMatrix::<L>::new().with("x", "x", LinearMap::scalar(2, 2.));
    let f = BlockCholesky::new().compute(&a).unwrap();
    assert_eq!(f.solve(&BlockVector::new().with("x", vec![2., 4.])), BlockVector::new().with("x", vec![1., 2.]));
}

#[test]
fn test_block_cholesky_fill1()
{
    use float_eq::assert_float_eq;
    use blocklin_core::{FloatGeneric, LinearMap};

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let _ = env_logger::builder().is_test(true).try_init();

    // arrow: hub couples with every leaf, leaves are decoupled from each other
    let mut a = BlockMatrix::<L>::new();
    a.insert_or_add("hub", "hub", LM::scalar(3, 10.));
    for leaf in ["a", "b", "c"] {
        a.insert_or_add(leaf, leaf, LM::scalar(3, 2.));
        a.insert_or_add(leaf, "hub", LM::dense(3, 3, vec![0.1; 9]));
        a.insert_or_add("hub", leaf, LM::dense(3, 3, vec![0.1; 9]));
    }

    assert_eq!(compute_fill(&a, "a").unwrap(), 9);
    assert_eq!(compute_fill(&a, "hub").unwrap(), 81);

    let f = BlockCholesky::new().compute(&a).unwrap();
    assert_eq!(f.order(), ["a", "b", "c", "hub"]);

    let b: BlockVector<L> = ["a", "b", "c", "hub"].iter().map(|&k| (k, vec![1., -1., 2.])).collect();
    let ax = &a * &f.solve(&b);
    for (k, b_k) in b.iter() {
        assert_float_eq!(ax.get(k).unwrap(), b_k.as_slice(), abs_all <= 1e-9);
    }

    let f = BlockCholesky::new().par(|p| p.pivot = PivotOrder::Natural).compute(&a).unwrap();
    assert_eq!(f.order(), ["a", "b", "c", "hub"]);

    let f = BlockCholesky::new().par(|p| p.pivot = PivotOrder::Natural)
        .compute(&a.clone().with("0", "0", LM::identity(1))).unwrap();
    assert_eq!(f.order()[0], "0");
}

#[test]
fn test_block_cholesky_error1()
{
    use blocklin_core::{FloatGeneric, LinearMap, LinMapError};

    type L = FloatGeneric<f64>;
    type LM = LinearMap<L>;

    let _ = env_logger::builder().is_test(true).try_init();

    let a = BlockMatrix::<L>::new()
        .with("x", "x", LM::dense(2, 2, vec![1., 1., 1., 1.]));
    assert_eq!(
        BlockCholesky::new().compute(&a).unwrap_err(),
        BlockError::Pivot { key: "x".to_string(), err: LinMapError::Singular }
    );

    let a = BlockMatrix::<L>::new()
        .with("x", "x", LM::identity(2))
        .with("y", "x", LM::dense(1, 2, vec![1., 1.]))
        .with("x", "y", LM::dense(2, 1, vec![1., 1.]));
    assert_eq!(
        BlockCholesky::new().compute(&a).unwrap_err(),
        BlockError::MissingDiagonal("y".to_string())
    );
}
