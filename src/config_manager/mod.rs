pub mod asr;
pub mod audio;
pub mod main;
pub mod system;
pub mod translate;
pub mod utils;

pub use asr::ASRConfig;
pub use audio::AudioConfig;
pub use main::Config;
pub use translate::TranslateConfig;
