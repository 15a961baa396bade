use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server answered {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to write export: {0}")]
    Export(#[from] std::io::Error),
}
