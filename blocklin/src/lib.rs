/*!
Block matrices of linear maps and their fill-minimizing block Cholesky factorization.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

This crate for Rust builds block-structured linear systems over [`blocklin_core::LinearMap`] blocks
and solves them repeatedly, as the linear subproblems of an iterative solver do.

# General usage

1. Choose a [`blocklin_core::LinAlgEx`] implementation to use:
   [`prelude::FloatGeneric`] is `num::Float`-generic and pure Rust.
1. Write blocks as [`prelude::LinearMap`]s, either directly by their dense, diagonal, scalar or Kronecker forms,
   or through [`MatBuild`].
1. Put them into a [`prelude::BlockMatrix`] \\(A\\) keyed by block names, one name per variable.
   \\(A\\) shall be block-symmetric positive semidefinite with nonsingular diagonal blocks.
1. Create a [`prelude::BlockCholesky`] instance, optionally set its parameters, and factor \\(A\\).
1. Invoke [`prelude::CholeskyFactor::solve`] with a [`prelude::BlockVector`] \\(b\\) as many times as needed.

# Examples

\\[
A = \left[\begin{array}{cc|c}
4 & 1 & 1 \\\\
1 & 3 & 0 \\\\ \hline
1 & 0 & 2
\end{array}\right],
\quad
b = \left[\begin{array}{c}
1 \\\\ 2 \\\\ \hline 3
\end{array}\right]
\\]
with blocks named `x` and `y`:

```
use float_eq::assert_float_eq;
use blocklin::prelude::*;
use blocklin::*;

//env_logger::init(); // Use any logger crate as `blocklin` uses `log` crate.

type La = FloatGeneric<f64>;
type AMatBuild = MatBuild<La>;
type ALinearMap = LinearMap<La>;
type ABlockMatrix = BlockMatrix<La>;
type ABlockVector = BlockVector<La>;
type ABlockCholesky = BlockCholesky<La>;

let a_xx = AMatBuild::new(MatType::SymPack(2))
           .iter_rowmaj(&[4., 1., 1., 3.]);
let a_yx = ALinearMap::dense(1, 2, vec![1., 0.]);

let a = ABlockMatrix::new()
        .with("x", "x", a_xx.to_linmap())
        .with("y", "x", a_yx.clone())
        .with("x", "y", a_yx.transpose())
        .with("y", "y", ALinearMap::scalar(1, 2.));

let b = ABlockVector::new()
        .with("x", vec![1., 2.])
        .with("y", vec![3.]);

let chol = ABlockCholesky::new().par(|p| {
   p.eps_zero = 1e-9;
});
let factor = chol.compute(&a).unwrap();
let x = factor.solve(&b);

let ax = &a * &x;
for (k, b_k) in b.iter() {
    assert_float_eq!(ax.get(k).unwrap(), b_k.as_slice(), abs_all <= 1e-9);
}
```
*/

mod matbuild;

pub use matbuild::*;

//

mod block_error;
mod block_vector;
mod block_matrix;
mod block_cholesky;

pub use block_error::*;
pub use block_vector::*;
pub use block_matrix::*;
pub use block_cholesky::*;

//

/// Prelude
pub mod prelude
{
   pub use blocklin_core::{FloatGeneric, LinearMap, ImplType};
   pub use crate::{BlockVector, BlockMatrix, BlockError};
   pub use crate::{BlockCholesky, CholeskyFactor, CholeskyParam, PivotOrder};
}
