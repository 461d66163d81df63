use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstatError {
    #[error("Invalid argument: {issue}")]
    InvalidArgument { issue: String },

    #[error("Shape mismatch: cannot combine distributions of lengths {left} and {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("Precondition not met: `{operation}` requires {requires}")]
    PreconditionNotMet {
        operation: &'static str,
        requires: &'static str,
    },

    #[error("Invalid alternative hypothesis '{0}': must be one of '>=', '<=' or '=='")]
    InvalidAlternative(String),
}

pub type BootstatResult<T> = Result<T, BootstatError>;
