use blocklin_core::LinMapError;

/// Block algebra and factorization errors.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockError
{
    /// No column left to choose a pivot from.
    EmptyPivot,
    /// Diagonal block of the pivot key is absent.
    MissingDiagonal(String),
    /// Diagonal block of the pivot key failed to be inverted.
    Pivot {
        /// Pivot key.
        key: String,
        /// Cause of the failure.
        err: LinMapError,
    },

    /// Not block diagonal, so [`crate::BlockMatrix::inverse`] is unable to invert.
    NotBlockDiagonal,
    /// Non-square block matrix with a number of rows and columns.
    NotSquare(usize, usize),
    /// Failure of a single [`blocklin_core::LinearMap`].
    LinMap(LinMapError),
}

impl core::fmt::Display for BlockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self {
            BlockError::EmptyPivot          => write!(f, "EmptyPivot: no column left to pivot"),
            BlockError::MissingDiagonal(k)  => write!(f, "MissingDiagonal: no diagonal block ({}, {})", k, k),
            BlockError::Pivot { key, err }  => write!(f, "Pivot: diagonal block of {} failed, {}", key, err),
            BlockError::NotBlockDiagonal    => write!(f, "NotBlockDiagonal: unable to invert"),
            BlockError::NotSquare(m, n)     => write!(f, "NotSquare: cannot invert {} x {} block matrix", m, n),
            BlockError::LinMap(err)         => write!(f, "LinMap: {}", err),
        }
    }
}

impl std::error::Error for BlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        match self {
            BlockError::Pivot { err, .. } | BlockError::LinMap(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LinMapError> for BlockError
{
    fn from(err: LinMapError) -> Self
    {
        BlockError::LinMap(err)
    }
}

//

#[test]
fn test_block_error1()
{
    use std::error::Error;

    let e = BlockError::Pivot { key: "x".to_string(), err: LinMapError::Singular };
    assert_eq!(e.to_string(), "Pivot: diagonal block of x failed, Singular: map is not invertible");
    assert!(e.source().is_some());

    let e: BlockError = LinMapError::NotSquare(1, 2).into();
    assert_eq!(e, BlockError::LinMap(LinMapError::NotSquare(1, 2)));
    assert!(BlockError::EmptyPivot.source().is_none());
}
