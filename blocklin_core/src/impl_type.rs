//! Type algebra over linear map representations

/// Representation of a [`crate::LinearMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImplType
{
    /// Dense matrix, see [`crate::LinMapDense`].
    Dense,
    /// Kronecker product of two linear maps, see [`crate::LinMapKron`].
    Kron,
    /// Diagonal matrix, see [`crate::LinMapDiag`].
    Diag,
    /// Scalar multiple of an identity matrix, see [`crate::LinMapScalar`].
    Scalar,
}

/// Operations on linear maps whose result representation [`compute_type`] decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinOp
{
    Multiply,
    Add,
    Transpose,
    Inverse,
}

/// Representation of the result of an operation.
///
/// Returns the [`ImplType`] that `op` applied to operands of `a` and `b` yields,
/// without computing anything.
/// `b` is ignored for the unary [`LinOp::Transpose`] and [`LinOp::Inverse`].
///
/// * A structured pair keeps the most specialized structure it can.
/// * Any pair not listed below falls back to [`ImplType::Dense`].
///
/// | op | operands | result |
/// |---|---|---|
/// | `Multiply` | `Scalar` with `t` (either side) | `t` |
/// | `Multiply` | `Diag`, `Diag` | `Diag` |
/// | `Multiply` | `Kron`, `Kron` | `Kron` |
/// | `Add` | `Scalar`, `Scalar` | `Scalar` |
/// | `Add` | `Scalar` or `Diag`, `Scalar` or `Diag` | `Diag` |
/// | `Transpose`, `Inverse` | `a` | `a` |
///
/// A Kronecker product times a Kronecker product is computed densely
/// when the factor shapes do not chain, though this still answers `Kron`.
pub fn compute_type(op: LinOp, a: ImplType, b: ImplType) -> ImplType
{
    use ImplType::*;

    match op {
        LinOp::Multiply => match (a, b) {
            (Scalar, t) | (t, Scalar) => t,
            (Diag, Diag) => Diag,
            (Kron, Kron) => Kron,
            _ => Dense,
        },
        LinOp::Add => match (a, b) {
            (Scalar, Scalar) => Scalar,
            (Scalar, Diag) | (Diag, Scalar) | (Diag, Diag) => Diag,
            _ => Dense,
        },
        LinOp::Transpose | LinOp::Inverse => a,
    }
}

/// Estimated number of structurally non-zero entries of a `m` x `n` linear map of `typ`.
///
/// Only used to rank candidates against each other,
/// so it is monotonic in how dense `typ` is rather than exact.
pub fn nonzeros(typ: ImplType, m: usize, n: usize) -> usize
{
    let n_diag = m.min(n);

    match typ {
        ImplType::Dense => m * n,
        ImplType::Kron => (m * n / 2).max(n_diag),
        ImplType::Diag | ImplType::Scalar => n_diag,
    }
}

//

#[test]
fn test_compute_type1()
{
    use ImplType::*;

    let all = [Dense, Kron, Diag, Scalar];

    for a in all {
        for b in all {
            // scalar never changes the other operand's representation
            if a == Scalar {
                assert_eq!(compute_type(LinOp::Multiply, a, b), b);
            }
            if b == Scalar {
                assert_eq!(compute_type(LinOp::Multiply, a, b), a);
            }
            // dense absorbs everything
            if a == Dense || b == Dense {
                assert_eq!(compute_type(LinOp::Multiply, a, b), Dense);
                assert_eq!(compute_type(LinOp::Add, a, b), Dense);
            }
            assert_eq!(compute_type(LinOp::Multiply, a, b), compute_type(LinOp::Multiply, b, a));
            assert_eq!(compute_type(LinOp::Add, a, b), compute_type(LinOp::Add, b, a));
        }
        assert_eq!(compute_type(LinOp::Transpose, a, Dense), a);
        assert_eq!(compute_type(LinOp::Inverse, a, Dense), a);
    }

    assert_eq!(compute_type(LinOp::Multiply, Diag, Diag), Diag);
    assert_eq!(compute_type(LinOp::Multiply, Kron, Kron), Kron);
    assert_eq!(compute_type(LinOp::Multiply, Kron, Diag), Dense);
    assert_eq!(compute_type(LinOp::Add, Scalar, Diag), Diag);
    assert_eq!(compute_type(LinOp::Add, Scalar, Scalar), Scalar);
    assert_eq!(compute_type(LinOp::Add, Kron, Kron), Dense);
}

#[test]
fn test_nonzeros1()
{
    for (m, n) in [(1, 1), (2, 3), (5, 5), (8, 2)] {
        let dense = nonzeros(ImplType::Dense, m, n);
        let kron = nonzeros(ImplType::Kron, m, n);
        let diag = nonzeros(ImplType::Diag, m, n);
        let scalar = nonzeros(ImplType::Scalar, m, n);

        assert!(dense >= kron);
        assert!(kron >= diag);
        assert!(diag >= scalar);
    }

    assert_eq!(nonzeros(ImplType::Dense, 4, 4), 16);
    assert_eq!(nonzeros(ImplType::Diag, 4, 4), 4);
}
