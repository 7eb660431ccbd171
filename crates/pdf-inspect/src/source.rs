//! Where a PDF comes from, and how its bytes are obtained

use std::path::PathBuf;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::analysis::{PdfAnalysis, analyze_pdf};
use crate::types::*;

/// How far into a body to look for the `%PDF-` header
const HEADER_WINDOW: usize = 1024;

/// A PDF to inspect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfSource {
    Bytes(Vec<u8>),
    /// Base64 text, optionally as a `data:` URL
    Base64(String),
    Path(PathBuf),
    Url(String),
}

impl PdfSource {
    /// Interpret a command-line argument: `http(s)://` and `data:` prefixes
    /// select a URL or inline data, anything else is a local path.
    pub fn parse(arg: &str) -> Self {
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            PdfSource::Url(arg.to_string())
        } else if lower.starts_with("data:") {
            PdfSource::Base64(arg.to_string())
        } else {
            PdfSource::Path(PathBuf::from(arg))
        }
    }
}

/// Decode base64 PDF data, accepting a `data:application/pdf;base64,` prefix
/// and embedded whitespace.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    let payload = match text.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => text,
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(cleaned)?)
}

/// Download a PDF, rejecting anything that is not one
pub async fn fetch_pdf(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pdf-inspect/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let network = |e: reqwest::Error| {
        log::warn!("Fetching {} failed: {}", url, e);
        InspectError::Network {
            url: url.to_string(),
            message: if e.is_timeout() {
                format!("timed out after {}s", timeout.as_secs())
            } else {
                e.to_string()
            },
        }
    };

    let response = client.get(url).send().await.map_err(network)?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown content type")
        .to_string();
    let body = response.bytes().await.map_err(network)?;

    classify_response(url, status, &content_type, &body)?;
    log::info!("Fetched {} ({} bytes)", url, body.len());
    Ok(body.to_vec())
}

/// Decide whether an HTTP response carries a PDF.
///
/// Status is checked first, then the body must start with a PDF header
/// (within the first kilobyte, as readers tolerate leading junk).
pub fn classify_response(url: &str, status: u16, content_type: &str, body: &[u8]) -> Result<()> {
    match status {
        200..=299 => {}
        404 => {
            return Err(InspectError::NotFound {
                url: url.to_string(),
            });
        }
        _ => {
            return Err(InspectError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
    }

    let window = &body[..body.len().min(HEADER_WINDOW)];
    if window.windows(5).any(|w| w == b"%PDF-") {
        Ok(())
    } else {
        Err(InspectError::ReturnedPage {
            url: url.to_string(),
            content_type: content_type.to_string(),
        })
    }
}

/// Load a PDF from any source and analyze it.
///
/// `timeout` applies to URL sources only. Parsing runs on the blocking pool.
pub async fn inspect_pdf(source: PdfSource, timeout: Duration) -> Result<PdfAnalysis> {
    let bytes = match source {
        PdfSource::Bytes(bytes) => bytes,
        PdfSource::Base64(text) => decode_base64(&text)?,
        PdfSource::Path(path) => {
            log::debug!("Reading {}", path.display());
            tokio::fs::read(&path).await?
        }
        PdfSource::Url(url) => fetch_pdf(&url, timeout).await?,
    };

    tokio::task::spawn_blocking(move || analyze_pdf(&bytes)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_argument_kinds() {
        assert_eq!(
            PdfSource::parse("https://example.com/book.pdf"),
            PdfSource::Url("https://example.com/book.pdf".to_string())
        );
        assert!(matches!(
            PdfSource::parse("data:application/pdf;base64,JVBERi0="),
            PdfSource::Base64(_)
        ));
        assert_eq!(
            PdfSource::parse("cover.pdf"),
            PdfSource::Path(PathBuf::from("cover.pdf"))
        );
    }

    #[test]
    fn strips_data_url_prefix_and_whitespace() {
        let decoded = decode_base64("data:application/pdf;base64,JVBE\nRi0x").unwrap();
        assert_eq!(decoded, b"%PDF-1");
        assert_eq!(decode_base64("JVBERi0x").unwrap(), b"%PDF-1");
        assert!(decode_base64("not base64!").is_err());
    }
}
