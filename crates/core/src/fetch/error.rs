use std::fmt;

/// The server answered, but with a non-success status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationFailure {
    pub status: u16,
}

impl fmt::Display for ApplicationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stock list endpoint answered HTTP {}", self.status)
    }
}

impl std::error::Error for ApplicationFailure {}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn survives_context_wrapping_for_downcast() {
        let err = Err::<(), _>(ApplicationFailure { status: 503 })
            .context("loading stock list")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ApplicationFailure>(),
            Some(&ApplicationFailure { status: 503 })
        );
    }
}
