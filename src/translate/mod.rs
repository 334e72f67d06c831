pub mod google;
pub mod languages;

use thiserror::Error;

pub use google::translate;
pub use languages::{resolve_code, supported_languages, AUTO};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation endpoint returned HTTP {0}")]
    Status(u16),
    #[error("unexpected translation response: {0}")]
    UnexpectedResponse(String),
}
