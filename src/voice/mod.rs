use std::path::PathBuf;
use std::time::Duration;

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use thiserror::Error;

pub mod orchestrator;
pub mod songbird_connector;

/// Errors that can occur while playing a sound
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Failed to join voice channel: {0}")]
    Join(String),

    #[error("Timed out joining voice channel after {0:?}")]
    JoinTimedOut(Duration),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Sound file not found: {0:?}")]
    SoundNotFound(PathBuf),

    #[error("Failed to play sound: {0}")]
    Playback(String),

    #[error("Sound did not finish within {0:?}")]
    PlaybackTimedOut(Duration),

    #[error("Failed to leave voice channel: {0}")]
    Disconnect(String),

    #[error("Shutting down, not accepting new sounds")]
    ShuttingDown,
}

/// Result type for voice operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Voice channel a sound should be played into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceTarget {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRequest {
    pub target: VoiceTarget,
    pub file_path: PathBuf,
}

/// The voice operations a playback needs. Connections are keyed by guild,
/// matching the one-call-per-guild model of the voice gateway.
#[async_trait]
pub trait VoiceConnector: Send + Sync {
    /// Join the target channel, replacing any connection the guild already has
    async fn join(&self, target: &VoiceTarget) -> VoiceResult<()>;

    /// Play the requested file on the guild's connection and wait for it to end
    async fn play(&self, request: &PlaybackRequest) -> VoiceResult<()>;

    /// Drop the guild's connection
    async fn leave(&self, guild_id: GuildId) -> VoiceResult<()>;
}
