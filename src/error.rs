use thiserror::Error;

#[derive(Error, Debug)]
pub enum DpccError {
    #[error("Not in a dpcc project. Run 'dpcc init' first.")]
    NotInitialized,

    #[error("Already initialized. Remove .dpcc/ to reinitialize.")]
    AlreadyInitialized,

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Ambiguous project id '{0}': matches more than one project")]
    AmbiguousId(String),

    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Loro error: {0}")]
    Loro(#[from] loro::LoroError),

    #[error("Loro encode error: {0}")]
    LoroEncode(#[from] loro::LoroEncodeError),
}

impl DpccError {
    pub fn invalid(field: &str, value: impl Into<String>) -> Self {
        DpccError::InvalidValue {
            field: field.to_string(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DpccError>;
