use std::sync::{Arc, Mutex};

use serenity::async_trait;
use serenity::model::id::GuildId;
use songbird::input::File;
use songbird::tracks::PlayMode;
use songbird::{Event, EventContext, Songbird, TrackEvent};
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use super::{PlaybackRequest, VoiceConnector, VoiceError, VoiceResult, VoiceTarget};

/// Voice connector backed by the songbird manager registered with the client
pub struct SongbirdConnector {
    manager: Arc<Songbird>,
}

impl SongbirdConnector {
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl VoiceConnector for SongbirdConnector {
    async fn join(&self, target: &VoiceTarget) -> VoiceResult<()> {
        let call = self
            .manager
            .join(target.guild_id, target.channel_id)
            .await
            .map_err(|e| VoiceError::Join(e.to_string()))?;

        // Sound only goes out, so don't receive anyone else's audio
        if let Err(e) = call.lock().await.deafen(true).await {
            warn!("Failed to self-deafen in guild {}: {}", target.guild_id, e);
        }

        Ok(())
    }

    async fn play(&self, request: &PlaybackRequest) -> VoiceResult<()> {
        let path = &request.file_path;

        // The driver only reports a missing file once the track starts, check up front
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(VoiceError::SoundNotFound(path.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VoiceError::SoundNotFound(path.clone()));
            }
            Err(e) => return Err(VoiceError::Playback(e.to_string())),
        }

        let call = self
            .manager
            .get(request.target.guild_id)
            .ok_or(VoiceError::NotConnected)?;

        let (tx, rx) = oneshot::channel();
        let notifier = TrackEndNotifier {
            guild_id: request.target.guild_id,
            done: Arc::new(Mutex::new(Some(tx))),
        };

        {
            let mut handler = call.lock().await;
            let track = handler.play_input(File::new(path.clone()).into());

            for event in [TrackEvent::End, TrackEvent::Error] {
                track
                    .add_event(Event::Track(event), notifier.clone())
                    .map_err(|e| VoiceError::Playback(e.to_string()))?;
            }
        }

        match rx.await {
            Ok(result) => result,
            // The driver dropped the track without firing an event
            Err(_) => Err(VoiceError::Playback("track ended unexpectedly".to_string())),
        }
    }

    async fn leave(&self, guild_id: GuildId) -> VoiceResult<()> {
        // Another request for the same guild may already have removed the call
        if self.manager.get(guild_id).is_none() {
            return Err(VoiceError::Disconnect("not connected".to_string()));
        }

        self.manager
            .remove(guild_id)
            .await
            .map_err(|e| VoiceError::Disconnect(e.to_string()))
    }
}

/// Reports the first end or error event of a track back to the waiting
/// playback. One clone is registered per event; whichever fires first wins.
#[derive(Clone)]
struct TrackEndNotifier {
    guild_id: GuildId,
    done: Arc<Mutex<Option<oneshot::Sender<VoiceResult<()>>>>>,
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(tracks) = ctx {
            let result = match tracks.first().map(|(state, _)| &state.playing) {
                Some(PlayMode::Errored(err)) => {
                    error!("Track errored in guild {}: {:?}", self.guild_id, err);
                    Err(VoiceError::Playback(format!("{:?}", err)))
                }
                _ => {
                    debug!("Track ended in guild {}", self.guild_id);
                    Ok(())
                }
            };

            let sender = self.done.lock().ok().and_then(|mut done| done.take());
            if let Some(sender) = sender {
                let _ = sender.send(result);
            }
        }

        Some(Event::Cancel)
    }
}
