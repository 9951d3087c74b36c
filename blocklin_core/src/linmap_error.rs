/// Linear map errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinMapError
{
    /// Inversion of a non-square map, with its number of rows and columns.
    NotSquare(usize, usize),
    /// Inversion of a map found singular.
    Singular,
}

impl core::fmt::Display for LinMapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self {
            LinMapError::NotSquare(m, n) => write!(f, "NotSquare: cannot invert {} x {} map", m, n),
            LinMapError::Singular        => write!(f, "Singular: map is not invertible"),
        }
    }
}

//

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for LinMapError {}
