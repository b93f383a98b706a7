use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid date '{input}': expected dd/MM/yyyy or yyyy-MM-dd")]
    InvalidDate { input: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to launch typst compiler '{binary}': {source}")]
    CompilerLaunch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("typst compilation failed: {0}")]
    Compilation(String),

    #[error("generated PDF could not be read back: {0}")]
    MalformedOutput(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background generation task failed: {0}")]
    Task(String),
}

impl From<tempfile::PersistError> for DocumentError {
    fn from(error: tempfile::PersistError) -> Self {
        DocumentError::Io(error.error)
    }
}

impl From<lopdf::Error> for DocumentError {
    fn from(error: lopdf::Error) -> Self {
        DocumentError::MalformedOutput(error.to_string())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
