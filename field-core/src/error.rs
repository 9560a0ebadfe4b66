use thiserror::Error;

/// Errors that can occur while loading or validating a [`crate::config::FieldConfig`].
///
/// The animation itself has no failure modes; only the configuration
/// surface reports errors.
#[derive(Error, Debug)]
pub enum FieldError {
    /// The configuration file could not be read.
    #[error("failed to read field config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for a `FieldConfig`.
    #[error("failed to parse field config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration value is out of its meaningful range.
    #[error("invalid field config: `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// No preset is registered under the given name.
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}
