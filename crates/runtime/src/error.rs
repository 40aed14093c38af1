use lexbdd_core::driver::DriverError;
use lexbdd_core::engine::EngineError;
use lexbdd_core::field::UnknownFieldKind;
use thiserror::Error;

/// Failure surfaced to the step layer; assertion mismatches and backend
/// faults are distinct so the runner can report them differently.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("{context}: {source}")]
    Engine {
        context: String,
        #[source]
        source: EngineError,
    },

    /// A cache miss queried the backend and no record matched. Raised
    /// explicitly instead of letting a first-record access fault.
    #[error("no {object} record matches criteria '{criteria}'")]
    NoMatchingRecord { object: String, criteria: String },

    #[error("expected {expected:?} but got {actual:?} ({context})")]
    Mismatch { expected: String, actual: String, context: String },

    #[error(transparent)]
    UnknownFieldKind(#[from] UnknownFieldKind),

    #[error("scenario has no active session; run a login step first")]
    NoSession,

    #[error("session is not authenticated against Salesforce")]
    NotAuthenticated,

    #[error("invalid fixture: {0}")]
    Fixture(String),
}

impl StepError {
    /// Wraps an engine fault with the object/criteria/field context the
    /// caller was working on.
    pub fn engine(context: impl Into<String>) -> impl FnOnce(EngineError) -> Self {
        let context = context.into();
        move |source| Self::Engine { context, source }
    }

    pub fn mismatch(
        expected: impl Into<String>,
        actual: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::Mismatch {
            expected: expected.into(),
            actual: actual.into(),
            context: context.into(),
        }
    }

    /// Compares two rendered strings exactly; whitespace and case are
    /// significant.
    pub fn check_eq(expected: &str, actual: &str, context: impl Into<String>) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::mismatch(expected, actual, context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_eq_is_exact() {
        assert!(StepError::check_eq("Saved", "Saved", "toast").is_ok());
        assert!(StepError::check_eq("Saved", "saved", "toast").is_err());
        assert!(StepError::check_eq("Saved", "Saved ", "toast").is_err());
    }

    #[test]
    fn mismatch_message_names_both_sides() {
        let err = StepError::mismatch("a", "b", "validation text for Account.Name");
        let rendered = err.to_string();
        assert!(rendered.contains("\"a\""));
        assert!(rendered.contains("\"b\""));
        assert!(rendered.contains("Account.Name"));
    }
}
