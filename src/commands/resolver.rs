//! Decides whether a chat message should play a sound, and where.
//!
//! Anything that is not a valid sound command from someone sitting in a voice
//! channel is ordinary chat traffic and resolves to `None` without an error.

use std::path::{Path, PathBuf};

use serenity::model::id::{ChannelId, GuildId, UserId};
use tracing::{debug, trace};

use super::command_table::CommandTable;
use crate::voice::{PlaybackRequest, VoiceTarget};

/// Extension appended to every sound id
pub const SOUND_EXTENSION: &str = "mp3";

/// The parts of a chat message the resolver looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author_id: UserId,
    pub channel_id: ChannelId,
    pub text: String,
}

/// A user's current voice channel within a guild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicePresence {
    pub user_id: UserId,
    pub channel_id: ChannelId,
}

/// Finds the guild a text channel belongs to
pub trait ChannelResolver {
    fn guild_of(&self, channel_id: ChannelId) -> Option<GuildId>;
}

/// Lists who is currently connected to voice in a guild
pub trait VoicePresenceLookup {
    fn voice_presences(&self, guild_id: GuildId) -> Vec<VoicePresence>;
}

#[derive(Debug, Clone)]
pub struct CommandResolver {
    table: CommandTable,
    prefix: String,
    sounds_folder: PathBuf,
}

impl CommandResolver {
    pub fn new(table: CommandTable, prefix: impl Into<String>, sounds_folder: impl Into<PathBuf>) -> Self {
        Self {
            table,
            prefix: prefix.into(),
            sounds_folder: sounds_folder.into(),
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve a message into a playback request.
    ///
    /// 1. Messages from the bot itself are ignored.
    /// 2. The text must start with the prefix.
    /// 3. The rest of the text must exactly match a command.
    /// 4. The channel must belong to a known guild.
    /// 5. The author must be in one of that guild's voice channels. Should the
    ///    author show up in more than one, the last presence listed wins.
    pub fn resolve(
        &self,
        msg: &IncomingMessage,
        self_id: UserId,
        channels: &impl ChannelResolver,
        presences: &impl VoicePresenceLookup,
    ) -> Option<PlaybackRequest> {
        if msg.author_id == self_id {
            return None;
        }

        let Some(command) = msg.text.strip_prefix(self.prefix.as_str()) else {
            trace!("Ignoring message without prefix in channel {}", msg.channel_id);
            return None;
        };

        let Some(sound_id) = self.table.lookup(command) else {
            trace!("Unknown sound command '{}'", command);
            return None;
        };

        let Some(guild_id) = channels.guild_of(msg.channel_id) else {
            debug!(
                "Channel {} is not a known guild channel, ignoring '{}'",
                msg.channel_id, command
            );
            return None;
        };

        let Some(presence) = presences
            .voice_presences(guild_id)
            .into_iter()
            .filter(|presence| presence.user_id == msg.author_id)
            .last()
        else {
            debug!(
                "User {} is not in a voice channel in guild {}, ignoring '{}'",
                msg.author_id, guild_id, command
            );
            return None;
        };

        let request = PlaybackRequest {
            target: VoiceTarget {
                guild_id,
                channel_id: presence.channel_id,
            },
            file_path: sound_path(&self.sounds_folder, sound_id),
        };
        debug!(
            "Resolved '{}' from user {} to {:?}",
            command, msg.author_id, request
        );
        Some(request)
    }
}

/// `<sounds folder>/<sound id>.mp3`
pub fn sound_path(sounds_folder: &Path, sound_id: &str) -> PathBuf {
    sounds_folder.join(format!("{}.{}", sound_id, SOUND_EXTENSION))
}
