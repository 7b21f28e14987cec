use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller asked to start parsing past the end of the input.
    #[error("start offset {offset} is past the end of the input ({len} characters)")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Typst compilation failed: {0}")]
    Compile(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
