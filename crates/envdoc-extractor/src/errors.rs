use thiserror::Error;

/// Failures raised while extracting a struct tree
///
/// The first three kinds degrade to an empty contribution and a warning; the
/// extraction carries on with the remaining fields. The rest abort the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{0} struct not found")]
    StructNotFound(String),

    #[error("No fields found in struct '{0}'")]
    NoFieldsFound(String),

    #[error("Dependency '{0}' is not available")]
    UnresolvedDependency(String),

    #[error("Nested struct '{0}' is never closed at its own indentation")]
    UnterminatedBlock(String),

    #[error("{stage} made no progress on '{name}'")]
    NoProgress { stage: &'static str, name: String },

    #[error("Plugin placeholder left unresolved in '{0}'")]
    ResidualPlaceholder(String),
}

impl ExtractError {
    /// Whether the error is reported as a warning rather than aborting
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            ExtractError::StructNotFound(_)
                | ExtractError::NoFieldsFound(_)
                | ExtractError::UnresolvedDependency(_)
        )
    }
}
