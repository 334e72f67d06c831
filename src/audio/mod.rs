pub mod asset;
pub mod converter;

pub use asset::{load_upload, AudioAsset};
pub use converter::{ConvertError, FfmpegConverter};
