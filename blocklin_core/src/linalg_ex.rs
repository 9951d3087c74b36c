use crate::LinAlg;

/// Linear algebra extended subtrait
///
/// <script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
/// <script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-svg.js"></script>
///
/// Dense matrix operations. All matrices are stored in column-major.
pub trait LinAlgEx: LinAlg + Clone
{
    /// Calculates \\(\alpha G x + \beta y\\).
    ///
    /// * If `transpose` is `true`, Calculate \\(\alpha G^T x + \beta y\\) instead.
    /// * `alpha` is a scalar \\(\alpha\\).
    /// * `n_row` is a number of rows of \\(G\\).
    /// * `n_col` is a number of columns of \\(G\\).
    /// * `mat` is a matrix \\(G\\), stored in column-major.
    ///   The length of `mat` shall be `n_row * n_col`.
    /// * `x` is a vector \\(x\\).
    ///   The length of `x` shall be `n_col` (or `n_row` if `transpose` is `true`).
    /// * `beta` is a scalar \\(\beta\\).
    /// * `y` is a vector \\(y\\) before entry,
    ///   \\(\alpha G x + \beta y\\) (or \\(\alpha G^T x + \beta y\\) if `transpose` is `true`) on exit.
    ///   The length of `y` shall be `n_row` (or `n_col` if `transpose` is `true`).
    fn transform_ge(transpose: bool, n_row: usize, n_col: usize, alpha: Self::F, mat: &[Self::F], x: &[Self::F], beta: Self::F, y: &mut[Self::F]);

    /// Calculates \\(\alpha\\,{\rm op}(A)\\,{\rm op}(B) + \beta C\\).
    ///
    /// * `transa`/`transb` select \\({\rm op}(A)=A^T\\)/\\({\rm op}(B)=B^T\\).
    /// * \\({\rm op}(A)\\) is `m` x `k`, \\({\rm op}(B)\\) is `k` x `n`.
    /// * `c` is a `m` x `n` matrix \\(C\\) before entry, the result on exit.
    fn mult_ge(transa: bool, transb: bool, m: usize, n: usize, k: usize,
        alpha: Self::F, a: &[Self::F], b: &[Self::F], beta: Self::F, c: &mut[Self::F]);

    /// Copies a `n_row` x `n_col` matrix `mat` into `out` as its `n_col` x `n_row` transpose.
    fn transpose_ge(n_row: usize, n_col: usize, mat: &[Self::F], out: &mut[Self::F]);

    /// Query of a length of work slice that [`LinAlgEx::inv_sy`] requires.
    ///
    /// Returns a length of work slice.
    /// * `n` is a number of rows and columns of \\(S\\).
    fn inv_sy_worklen(n: usize) -> usize;

    /// Inverts a symmetric matrix \\(S\\) in place.
    ///
    /// The matrix is factorized as \\(S = L D L^T\\) with unit lower-triangular \\(L\\) and no pivoting.
    ///
    /// Returns `Err` if a pivot \\(d_i\\) has \\(|d_i| \le\\) `eps_zero`; `mat` is then left in an unspecified state.
    /// * `mat` is \\(S\\) before entry, \\(S^{-1}\\) on exit, stored in full column-major `n` x `n`.
    /// * `work` slice is used for temporal variables.
    fn inv_sy(n: usize, mat: &mut[Self::F], eps_zero: Self::F, work: &mut[Self::F]) -> Result<(), ()>;
}
