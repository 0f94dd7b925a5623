use crate::error::{Error, Result};

/// Result of an iteration-bounded algorithm.
///
/// Both variants carry a usable value. `Exhausted` means the iteration budget
/// ran out before the stopping criterion was met, so the value is a best effort.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Converged(T),
    Exhausted(T),
}

impl<T> Outcome<T> {
    pub fn is_converged(&self) -> bool {
        matches!(self, Outcome::Converged(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Converged(v) | Outcome::Exhausted(v) => v,
        }
    }

    /// Accepts the value whether or not the algorithm converged.
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Converged(v) | Outcome::Exhausted(v) => v,
        }
    }

    /// Turns an exhausted budget into [`Error::ConvergenceFailed`].
    pub fn into_result(self, iterations: usize) -> Result<T> {
        match self {
            Outcome::Converged(v) => Ok(v),
            Outcome::Exhausted(_) => Err(Error::ConvergenceFailed { iterations }),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Converged(v) => Outcome::Converged(f(v)),
            Outcome::Exhausted(v) => Outcome::Exhausted(f(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_becomes_error_only_on_request() {
        let out = Outcome::Exhausted(7);
        assert!(!out.is_converged());
        assert_eq!(out.clone().into_inner(), 7);
        assert_eq!(
            out.into_result(200),
            Err(Error::ConvergenceFailed { iterations: 200 })
        );
        assert_eq!(Outcome::Converged(3).map(|v| v * 2).into_result(1), Ok(6));
    }
}
