//! Read back page sizes, boxes and metadata from a PDF.
//!
//! Sources can be inline bytes, base64 text, a local path or a URL.

mod analysis;
mod source;
mod types;

pub use analysis::{
    BoxInches, FirstPageBoxes, PageDimensions, PdfAnalysis, analyze_pdf, round_inches,
};
pub use source::{PdfSource, classify_response, decode_base64, fetch_pdf, inspect_pdf};
pub use types::*;
