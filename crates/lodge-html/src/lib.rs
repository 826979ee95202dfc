//! Lodge HTML loader
//!
//! Parses markup with html5ever and converts the result into a
//! `lodge_dom::Document` the accessibility core can work on.

mod parser;

pub use parser::HtmlParser;

use lodge_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, HtmlError> {
    HtmlParser::new().parse(html)
}

/// HTML loading error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dom(#[from] lodge_dom::DomError),
}
