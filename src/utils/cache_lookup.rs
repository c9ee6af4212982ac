use serenity::cache::Cache;
use serenity::model::id::{ChannelId, GuildId};

use crate::commands::resolver::{ChannelResolver, VoicePresence, VoicePresenceLookup};

/// Answers the resolver's channel and voice-state questions from the gateway cache.
///
/// Cache references are only held for the duration of a single lookup, so this
/// never keeps a guild locked across an await.
pub struct CacheLookup<'a> {
    cache: &'a Cache,
}

impl<'a> CacheLookup<'a> {
    pub fn new(cache: &'a Cache) -> Self {
        Self { cache }
    }
}

impl ChannelResolver for CacheLookup<'_> {
    #[allow(deprecated)]
    fn guild_of(&self, channel_id: ChannelId) -> Option<GuildId> {
        self.cache.channel(channel_id).map(|channel| channel.guild_id)
    }
}

impl VoicePresenceLookup for CacheLookup<'_> {
    fn voice_presences(&self, guild_id: GuildId) -> Vec<VoicePresence> {
        let Some(guild) = self.cache.guild(guild_id) else {
            return Vec::new();
        };

        guild
            .voice_states
            .values()
            .filter_map(|state| {
                state.channel_id.map(|channel_id| VoicePresence {
                    user_id: state.user_id,
                    channel_id,
                })
            })
            .collect()
    }
}
