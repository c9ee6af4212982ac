//! Voice connector doubles for the playback tests

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use serenity::model::id::GuildId;
use soundboard::voice::{PlaybackRequest, VoiceConnector, VoiceResult, VoiceTarget};

mock! {
    pub Connector {}

    #[async_trait]
    impl VoiceConnector for Connector {
        async fn join(&self, target: &VoiceTarget) -> VoiceResult<()>;
        async fn play(&self, request: &PlaybackRequest) -> VoiceResult<()>;
        async fn leave(&self, guild_id: GuildId) -> VoiceResult<()>;
    }
}

/// One step of a playback as seen by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Join(GuildId),
    Play(GuildId),
    Leave(GuildId),
}

/// Connector that records every call and can be slowed down to force
/// interleaving or deadlines
#[derive(Default)]
pub struct RecordingConnector {
    pub steps: Mutex<Vec<Step>>,
    pub join_delay: Duration,
    pub play_delay: Duration,
}

impl RecordingConnector {
    pub fn with_delays(join_delay: Duration, play_delay: Duration) -> Self {
        Self {
            steps: Mutex::new(Vec::new()),
            join_delay,
            play_delay,
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.steps.lock().unwrap().clone()
    }

    /// Steps that touched one guild, in order
    pub fn steps_for(&self, guild_id: GuildId) -> Vec<Step> {
        self.steps()
            .into_iter()
            .filter(|step| match step {
                Step::Join(g) | Step::Play(g) | Step::Leave(g) => *g == guild_id,
            })
            .collect()
    }

    fn record(&self, step: Step) {
        self.steps.lock().unwrap().push(step);
    }
}

#[async_trait]
impl VoiceConnector for RecordingConnector {
    async fn join(&self, target: &VoiceTarget) -> VoiceResult<()> {
        tokio::time::sleep(self.join_delay).await;
        self.record(Step::Join(target.guild_id));
        Ok(())
    }

    async fn play(&self, request: &PlaybackRequest) -> VoiceResult<()> {
        self.record(Step::Play(request.target.guild_id));
        tokio::time::sleep(self.play_delay).await;
        Ok(())
    }

    async fn leave(&self, guild_id: GuildId) -> VoiceResult<()> {
        self.record(Step::Leave(guild_id));
        Ok(())
    }
}
