//! Resolver error types.

/// Why an enum could not be resolved.
#[derive(Debug)]
pub enum ResolveError {
    /// The artifact, its build info, its source text, or the parse failed.
    ///
    /// Carries the collaborator's error as-is: its top message is this
    /// error's message and its causes are this error's sources.
    Lookup(anyhow::Error),

    /// The source parsed, but declares no enum with that name.
    NotFound {
        /// Contract identifier as given by the caller
        contract: String,
        /// Enum that was searched for
        enum_name: String,
    },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound { .. })
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, ResolveError::Lookup(_))
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Lookup(err) => write!(f, "{}", err),
            ResolveError::NotFound {
                contract,
                enum_name,
            } => write!(
                f,
                "Enum \"{}\" not found in the source of contract \"{}\"",
                enum_name, contract
            ),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Lookup(err) => std::error::Error::source(&**err),
            ResolveError::NotFound { .. } => None,
        }
    }
}

impl From<anyhow::Error> for ResolveError {
    fn from(err: anyhow::Error) -> Self {
        ResolveError::Lookup(err)
    }
}
