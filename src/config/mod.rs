pub mod settings;

pub use settings::{AppConfig, PlaybackBackend, PlaybackConfig};
