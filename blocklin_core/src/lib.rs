/*!
Linear maps with structured representations.

<script src="https://polyfill.io/v3/polyfill.min.js?features=es6"></script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>

A [`LinearMap`] is a shared handle to a linear operator \\(K \in \mathbb{R}^{m \times n}\\)
held as a dense matrix, a Kronecker product, a diagonal matrix or a scalar matrix.
Products and sums of maps keep the cheapest representation that [`compute_type`] allows.

Numeric kernels are supplied by a [`LinAlgEx`] implementation;
[`FloatGeneric`] is a `num::Float`-generic one in pure Rust.

This crate is `no_std` and needs `alloc`.
*/

#![no_std]

extern crate alloc;

mod linalg;
mod linalg_ex;
mod operator;

pub use linalg::*;
pub use linalg_ex::*;
pub use operator::*;

//

mod floatgeneric;

pub use floatgeneric::*;

//

mod impl_type;
mod linmap_error;

pub use impl_type::*;
pub use linmap_error::*;

//

mod linmap;
mod linmap_dense;
mod linmap_diag;
mod linmap_kron;

pub use linmap::*;
pub use linmap_dense::*;
pub use linmap_diag::*;
pub use linmap_kron::*;
