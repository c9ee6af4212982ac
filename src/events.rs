use std::sync::Arc;

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{debug, error, info, warn};

use crate::commands::resolver::{CommandResolver, IncomingMessage};
use crate::utils::cache_lookup::CacheLookup;
use crate::voice::orchestrator::PlaybackOrchestrator;
use crate::voice::songbird_connector::SongbirdConnector;
use crate::voice::{PlaybackRequest, VoiceError};

pub struct Handler {
    resolver: Arc<CommandResolver>,
    orchestrator: Arc<PlaybackOrchestrator<SongbirdConnector>>,
}

impl Handler {
    pub fn new(
        resolver: Arc<CommandResolver>,
        orchestrator: Arc<PlaybackOrchestrator<SongbirdConnector>>,
    ) -> Self {
        Self {
            resolver,
            orchestrator,
        }
    }
}

#[async_trait]
impl serenity::prelude::EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "Connected as {} with {} sound commands (prefix '{}')",
            ready.user.name,
            self.resolver.table().len(),
            self.resolver.prefix()
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let incoming = IncomingMessage {
            author_id: msg.author.id,
            channel_id: msg.channel_id,
            text: msg.content,
        };

        // Resolve in its own scope so no cache reference outlives the lookup
        let request = {
            let self_id = ctx.cache.current_user().id;
            let lookup = CacheLookup::new(&ctx.cache);
            self.resolver.resolve(&incoming, self_id, &lookup, &lookup)
        };

        let Some(request) = request else {
            return;
        };

        info!(
            "User {} requested {:?} in guild {}",
            incoming.author_id, request.file_path, request.target.guild_id
        );

        if let Err(err) = self.orchestrator.play(&request).await {
            report_failure(&request, &err);
        }
    }
}

/// Playback failures are only visible to the operator, never in the chat
fn report_failure(request: &PlaybackRequest, err: &VoiceError) {
    let guild_id = request.target.guild_id;
    match err {
        VoiceError::ShuttingDown => {
            debug!("Dropped {:?} in guild {}: {}", request.file_path, guild_id, err)
        }
        VoiceError::Disconnect(_) => {
            warn!("Sound played in guild {} but leaving failed: {}", guild_id, err)
        }
        _ => error!(
            "Error playing {:?} in guild {}: {}",
            request.file_path, guild_id, err
        ),
    }
}
