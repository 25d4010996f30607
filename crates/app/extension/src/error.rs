/// Failures assembling the extension registry.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    #[error("extension dependencies form a cycle involving: {0:?}")]
    CyclicDependency(Vec<String>),

    #[error("{dependent} depends on {dependency}, which is not a known extension")]
    UnknownDependency { dependent: String, dependency: String },

    #[error("{0} appears more than once among the discovered extensions")]
    DuplicateExtension(String),
}
