use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or did not match the expected shape.
    #[error("cannot load Raedificare configuration: {0}")]
    Figment(#[from] figment::Error),

    #[error("{field} = {reason}")]
    InvalidValue { field: String, reason: String },
}
