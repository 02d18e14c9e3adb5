use thiserror::Error;

/// Broad failure category, for callers that branch on the kind of failure
/// rather than on the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Uninitialized,
    NotFound,
    Inconsistent,
    InvalidArgument,
}

/// Failures raised by the engine's entry points.
///
/// A replay that stops early is not one of these: it is a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("project not initialized; call init_project first")]
    Uninitialized,

    #[error("decision not found: {0}")]
    DecisionNotFound(String),

    #[error("option not found: {decision_id} / {option_id}")]
    OptionNotFound {
        decision_id: String,
        option_id: String,
    },

    #[error("no decision recorded at step {0}")]
    StepNotFound(usize),

    #[error("decision id mismatch at step {step}: expected \"{expected}\", recorded \"{recorded}\"")]
    DecisionMismatch {
        step: usize,
        expected: String,
        recorded: String,
    },

    #[error("invalid step {0}: step 0 is the baseline and cannot be revised")]
    InvalidStep(usize),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Uninitialized => ErrorKind::Uninitialized,
            EngineError::DecisionNotFound(_)
            | EngineError::OptionNotFound { .. }
            | EngineError::StepNotFound(_) => ErrorKind::NotFound,
            EngineError::DecisionMismatch { .. } => ErrorKind::Inconsistent,
            EngineError::InvalidStep(_) => ErrorKind::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(EngineError::Uninitialized.kind(), ErrorKind::Uninitialized);
        assert_eq!(EngineError::StepNotFound(9).kind(), ErrorKind::NotFound);
        assert_eq!(
            EngineError::DecisionMismatch {
                step: 1,
                expected: "a".into(),
                recorded: "b".into()
            }
            .kind(),
            ErrorKind::Inconsistent
        );
        assert_eq!(EngineError::InvalidStep(0).kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn messages_name_the_ids() {
        let err = EngineError::OptionNotFound {
            decision_id: "arch".into(),
            option_id: "mono".into(),
        };
        assert_eq!(err.to_string(), "option not found: arch / mono");
    }
}
