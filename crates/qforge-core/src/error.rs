use crate::query::ParseDirectionError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured assembly error with a stable classification.
/// Returned by scope and sort resolution; filters never fail.
/// Predicates accumulated before the failing call stay on the query.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a configuration error raised while resolving a scope.
    pub(crate) fn scope_configuration(err: ConfigurationError) -> Self {
        Self::configuration(ErrorOrigin::Scope, err)
    }

    /// Construct a configuration error raised while resolving a sort handler.
    pub(crate) fn sort_configuration(err: ConfigurationError) -> Self {
        Self::configuration(ErrorOrigin::Sort, err)
    }

    fn configuration(origin: ErrorOrigin, err: ConfigurationError) -> Self {
        Self {
            class: ErrorClass::Configuration,
            origin,
            message: err.to_string(),
            detail: Some(ErrorDetail::Configuration(err)),
        }
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    /// Borrow the configuration detail, if this error carries one.
    #[must_use]
    pub const fn configuration_detail(&self) -> Option<&ConfigurationError> {
        match &self.detail {
            Some(ErrorDetail::Configuration(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ParseDirectionError> for Error {
    fn from(err: ParseDirectionError) -> Self {
        Self {
            class: ErrorClass::InvalidInput,
            origin: ErrorOrigin::Sort,
            message: err.to_string(),
            detail: Some(ErrorDetail::Direction(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`Error`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Configuration(ConfigurationError),
    #[error("{0}")]
    Direction(ParseDirectionError),
}

///
/// Capability
/// Named contract a resolved handler must expose.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Capability {
    Query,
    Build,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Query => "query()",
            Self::Build => "build()",
        };
        write!(f, "{label}")
    }
}

///
/// ConfigurationError
///
/// A scope or sort reference that cannot be turned into exactly one
/// callable target.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigurationError {
    #[error("'{target}' must implement {capability}")]
    MissingCapability {
        target: String,
        capability: Capability,
    },

    #[error("'{target}' does not resolve to a registered component")]
    UnresolvedTarget { target: String },

    #[error("'{target}' has no method '{method}'")]
    UnknownMethod { target: String, method: String },

    #[error("entity '{entity}' declares no local scope '{method}'")]
    UnknownLocalScope { entity: String, method: String },
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    InvalidInput,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::InvalidInput => "invalid_input",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Scope,
    Sort,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scope => "scope",
            Self::Sort => "sort",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
