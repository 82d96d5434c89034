use thiserror::Error;

/// The `{kind, item, parameter, message}` shape every error bubbling out
/// of the kernel carries (spec §7).
#[derive(Debug, Error)]
#[error("{kind}: item={item:?} parameter={parameter:?}: {message}")]
pub struct FmbdError {
    pub kind: ErrorKind,
    pub item: Option<usize>,
    pub parameter: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Consistency,
    ParameterDomain,
    RuntimeNumerical,
    UserFunction,
    FatalInvariant,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Consistency => "consistency error",
            ErrorKind::ParameterDomain => "parameter domain error",
            ErrorKind::RuntimeNumerical => "runtime numerical error",
            ErrorKind::UserFunction => "user-function error",
            ErrorKind::FatalInvariant => "fatal invariant violation",
        };
        write!(f, "{s}")
    }
}

impl FmbdError {
    pub fn consistency(item: impl Into<Option<usize>>, message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Consistency, item: item.into(), parameter: None, message: message.into() }
    }

    pub fn parameter_domain(item: impl Into<Option<usize>>, parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ParameterDomain,
            item: item.into(),
            parameter: Some(parameter.into()),
            message: message.into(),
        }
    }

    pub fn runtime_numerical(item: impl Into<Option<usize>>, message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::RuntimeNumerical, item: item.into(), parameter: None, message: message.into() }
    }

    pub fn user_function(item: impl Into<Option<usize>>, message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::UserFunction, item: item.into(), parameter: None, message: message.into() }
    }

    pub fn fatal_invariant(message: impl Into<String>) -> Self {
        Self { kind: ErrorKind::FatalInvariant, item: None, parameter: None, message: message.into() }
    }
}

pub type FmbdResult<T> = Result<T, FmbdError>;
