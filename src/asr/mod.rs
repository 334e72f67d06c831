pub mod dispatcher;
pub mod interface;

pub use dispatcher::{default_range_input, dispatch, parse_range, parse_range_input, Range, TranscriptionRequest};
pub use interface::{ASRRequest, ASRResponse, Transcriber};
