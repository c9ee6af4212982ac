//! Sample data used across the soundboard tests

use std::collections::HashMap;
use std::path::PathBuf;

use serenity::model::id::{ChannelId, GuildId, UserId};
use soundboard::commands::command_table::CommandTable;
use soundboard::commands::resolver::{
    ChannelResolver, CommandResolver, IncomingMessage, VoicePresence, VoicePresenceLookup,
};
use soundboard::voice::{PlaybackRequest, VoiceTarget};

/// Commands file in the same shape the bot loads at startup
pub const SAMPLE_COMMANDS: &str = r#"[
    { "commands": ["airhorn"], "fileName": "airhorn" },
    { "commands": ["cena", "johncena"], "fileName": "jc_full" },
    { "commands": ["sad", "trombone"], "fileName": "sad-trombone" }
]"#;

pub const PREFIX: &str = "~";
pub const SOUNDS_FOLDER: &str = "sounds";

pub const BOT_ID: UserId = UserId::new(1);
pub const USER_1: UserId = UserId::new(101);
pub const USER_2: UserId = UserId::new(102);
pub const TEXT_CHANNEL_1: ChannelId = ChannelId::new(201);
pub const TEXT_CHANNEL_2: ChannelId = ChannelId::new(202);
pub const VOICE_CHANNEL_1: ChannelId = ChannelId::new(301);
pub const VOICE_CHANNEL_2: ChannelId = ChannelId::new(302);
pub const GUILD_1: GuildId = GuildId::new(401);
pub const GUILD_2: GuildId = GuildId::new(402);

/// Gateway state held in plain maps
#[derive(Default)]
pub struct FakeGuildState {
    pub channels: HashMap<ChannelId, GuildId>,
    pub presences: HashMap<GuildId, Vec<VoicePresence>>,
}

impl FakeGuildState {
    pub fn with_channel(mut self, channel_id: ChannelId, guild_id: GuildId) -> Self {
        self.channels.insert(channel_id, guild_id);
        self
    }

    pub fn with_presence(mut self, guild_id: GuildId, user_id: UserId, channel_id: ChannelId) -> Self {
        self.presences
            .entry(guild_id)
            .or_default()
            .push(VoicePresence {
                user_id,
                channel_id,
            });
        self
    }
}

impl ChannelResolver for FakeGuildState {
    fn guild_of(&self, channel_id: ChannelId) -> Option<GuildId> {
        self.channels.get(&channel_id).copied()
    }
}

impl VoicePresenceLookup for FakeGuildState {
    fn voice_presences(&self, guild_id: GuildId) -> Vec<VoicePresence> {
        self.presences.get(&guild_id).cloned().unwrap_or_default()
    }
}

/// Two guilds, each with one user sitting in voice
pub fn two_guild_state() -> FakeGuildState {
    FakeGuildState::default()
        .with_channel(TEXT_CHANNEL_1, GUILD_1)
        .with_channel(TEXT_CHANNEL_2, GUILD_2)
        .with_presence(GUILD_1, USER_1, VOICE_CHANNEL_1)
        .with_presence(GUILD_2, USER_2, VOICE_CHANNEL_2)
}

pub fn sample_table() -> CommandTable {
    CommandTable::from_json(SAMPLE_COMMANDS).expect("sample commands should load")
}

pub fn sample_resolver() -> CommandResolver {
    CommandResolver::new(sample_table(), PREFIX, SOUNDS_FOLDER)
}

pub fn message(author_id: UserId, channel_id: ChannelId, text: &str) -> IncomingMessage {
    IncomingMessage {
        author_id,
        channel_id,
        text: text.to_string(),
    }
}

pub fn request(guild_id: GuildId, channel_id: ChannelId, sound: &str) -> PlaybackRequest {
    PlaybackRequest {
        target: VoiceTarget {
            guild_id,
            channel_id,
        },
        file_path: PathBuf::from(SOUNDS_FOLDER).join(format!("{}.mp3", sound)),
    }
}
