//! A Discord soundboard: plays a short `.mp3` clip into the author's voice
//! channel whenever a message matches one of the configured sound commands.

/// Sound command table and message resolution.
pub mod commands;
/// Environment configuration and the startup error type.
pub mod config;
/// Serenity gateway event handler.
pub mod events;
/// Adapters over the serenity cache.
pub mod utils;
/// Voice connection and playback orchestration.
pub mod voice;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
