use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("unknown field key: {0}")]
    UnknownField(String),

    #[error("not a boolean eligibility flag: {0}")]
    UnknownFlag(String),

    #[error("not a categorical field: {0}")]
    UnknownCategory(String),

    #[error("unknown selection for {field}: '{value}' (expected one of: {expected})")]
    UnknownSelection {
        field: String,
        value: String,
        expected: String,
    },

    #[error("rubric has no rule for {0}")]
    MissingRule(String),

    #[error("invalid rubric: {0}")]
    InvalidRubric(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScoreError {
    /// Errors that mean the rubric itself is misconfigured, as opposed to bad
    /// input plumbing (missing files, unreadable streams).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScoreError::UnknownField(_)
                | ScoreError::UnknownFlag(_)
                | ScoreError::UnknownCategory(_)
                | ScoreError::UnknownSelection { .. }
                | ScoreError::MissingRule(_)
                | ScoreError::InvalidRubric(_)
                | ScoreError::ConfigParse(_)
                | ScoreError::Toml(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScoreError>;
