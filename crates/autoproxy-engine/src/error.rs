//! Synthesis error types

/// Result type for cloning, merging, and synthesis
pub type SynthesisResult<T> = Result<T, SynthesisError>;

/// Errors raised while synthesizing a proxy type.
///
/// Every variant is fatal for the interface being synthesized and
/// surfaces to the caller; nothing is retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// Source interface, tag definition, or enum could not be resolved
    #[error("Type not found: {0}")]
    NotFound(String),

    /// The interface does not carry the remote-interface marker
    #[error("Not a remote interface: {0}")]
    NotRemoteInterface(String),

    /// A tag member holds a value whose shape cannot be converted
    #[error("Unsupported value for {tag}.{member}: {found}")]
    UnsupportedValueKind {
        /// Kind of the tag being cloned
        tag: String,
        /// Member name
        member: String,
        /// Shape of the offending value
        found: &'static str,
    },

    /// A source method has no forwarding method with the same signature
    #[error("No forwarding method on {type_name} matches {signature}")]
    SignatureMismatch {
        /// Synthesized type name
        type_name: String,
        /// Source method signature
        signature: String,
    },

    /// The type name was loaded by an earlier pass for another source
    #[error("Type already loaded: {0}")]
    AlreadyLoaded(String),
}
