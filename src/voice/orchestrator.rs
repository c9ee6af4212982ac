//! Runs one playback request through the join → play → leave sequence.
//!
//! Every step after a successful join is followed by exactly one leave, so a
//! failed or hung sound never leaves the bot sitting in a voice channel. There
//! is no per-guild serialization: two requests for the same guild race on
//! that guild's connection.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use serenity::model::id::GuildId;
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{PlaybackRequest, VoiceConnector, VoiceError, VoiceResult};

pub struct PlaybackOrchestrator<C> {
    connector: C,
    join_timeout: Duration,
    playback_timeout: Duration,
    accepting: AtomicBool,
    in_flight: AtomicUsize,
    drained: Notify,
}

/// Decrements the in-flight count when a playback ends, however it ends
struct InFlight<'a, C> {
    orchestrator: &'a PlaybackOrchestrator<C>,
}

impl<C> Drop for InFlight<'_, C> {
    fn drop(&mut self) {
        if self.orchestrator.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.orchestrator.drained.notify_waiters();
        }
    }
}

impl<C: VoiceConnector> PlaybackOrchestrator<C> {
    pub fn new(connector: C, join_timeout: Duration, playback_timeout: Duration) -> Self {
        Self {
            connector,
            join_timeout,
            playback_timeout,
            accepting: AtomicBool::new(true),
            in_flight: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Play a sound into the requested voice channel.
    ///
    /// Join failures stop the sequence before anything is played. Once joined,
    /// the connection is always released; a playback error takes precedence
    /// over a disconnect error in the returned result.
    pub async fn play(&self, request: &PlaybackRequest) -> VoiceResult<()> {
        let _in_flight = self.enter()?;
        let target = &request.target;

        debug!(
            "Joining voice channel {} in guild {}",
            target.channel_id, target.guild_id
        );
        match timeout(self.join_timeout, self.connector.join(target)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(err),
            Err(_) => return Err(VoiceError::JoinTimedOut(self.join_timeout)),
        }

        debug!("Playing {:?} in guild {}", request.file_path, target.guild_id);
        let played = match timeout(self.playback_timeout, self.connector.play(request)).await {
            Ok(result) => result,
            Err(_) => Err(VoiceError::PlaybackTimedOut(self.playback_timeout)),
        };

        let left = self.leave(target.guild_id).await;

        match (played, left) {
            (Ok(()), Ok(())) => {
                info!("Sound played: {:?}", request.file_path);
                Ok(())
            }
            (Ok(()), Err(leave_err)) => Err(leave_err),
            (Err(play_err), Ok(())) => Err(play_err),
            (Err(play_err), Err(leave_err)) => {
                warn!(
                    "Also failed to leave guild {} after playback error: {}",
                    target.guild_id, leave_err
                );
                Err(play_err)
            }
        }
    }

    async fn leave(&self, guild_id: GuildId) -> VoiceResult<()> {
        debug!("Leaving voice channel in guild {}", guild_id);
        match timeout(self.join_timeout, self.connector.leave(guild_id)).await {
            Ok(result) => result,
            Err(_) => Err(VoiceError::Disconnect(format!(
                "timed out after {:?}",
                self.join_timeout
            ))),
        }
    }

    fn enter(&self) -> VoiceResult<InFlight<'_, C>> {
        // Count first so a concurrent drain never misses this playback
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlight { orchestrator: self };

        if !self.accepting.load(Ordering::SeqCst) {
            return Err(VoiceError::ShuttingDown);
        }
        Ok(guard)
    }

    /// Stop accepting new playback requests. Sounds already playing continue.
    pub fn shutdown(&self) {
        if self.accepting.swap(false, Ordering::SeqCst) {
            info!(
                "Soundboard shutting down with {} sound(s) in flight",
                self.in_flight()
            );
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait up to `grace` for in-flight sounds to finish. Returns `true` if
    /// everything drained in time.
    pub async fn drain(&self, grace: Duration) -> bool {
        let wait = async {
            loop {
                let notified = self.drained.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();

                if self.in_flight() == 0 {
                    return;
                }
                notified.await;
            }
        };

        timeout(grace, wait).await.is_ok()
    }
}
