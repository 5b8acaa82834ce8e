/// Errors raised by document mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// No element with the given id exists in the document.
    #[error("element '{0}' not found")]
    MissingElement(String),

    /// The element holds text and cannot take children.
    #[error("element '{0}' cannot hold children")]
    NotAContainer(String),

    /// The root element cannot be removed or given siblings.
    #[error("operation not allowed on the document root '{0}'")]
    Root(String),
}
