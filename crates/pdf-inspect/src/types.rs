use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error(
        "{url} returned a web page instead of a PDF ({content_type}). \
         Use a direct download link or upload the file instead."
    )]
    ReturnedPage { url: String, content_type: String },
    #[error("No PDF found at {url} (404). Check that the link is correct and public.")]
    NotFound { url: String },
    #[error("Fetching {url} failed with HTTP status {status}.")]
    HttpStatus { url: String, status: u16 },
    #[error("Could not reach {url}: {message}. Check the link and your connection.")]
    Network { url: String, message: String },
}

pub type Result<T> = std::result::Result<T, InspectError>;
