use std::sync::Arc;

use dotenv::dotenv;
use serenity::Client;
use serenity::prelude::GatewayIntents;
use songbird::{SerenityInit, Songbird};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use soundboard::Error;
use soundboard::commands::command_table::CommandTable;
use soundboard::commands::resolver::CommandResolver;
use soundboard::config::Config;
use soundboard::events::Handler;
use soundboard::utils::signals::shutdown_signal;
use soundboard::voice::orchestrator::PlaybackOrchestrator;
use soundboard::voice::songbird_connector::SongbirdConnector;

#[tokio::main]
async fn main() -> Result<(), Error> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("soundboard=info,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let config = Config::from_env()?;
    let table = CommandTable::load(&config.commands_file)?;
    if table.is_empty() {
        warn!("No sound commands configured in {:?}", config.commands_file);
    }

    let resolver = Arc::new(CommandResolver::new(
        table,
        config.prefix.clone(),
        config.sounds_folder.clone(),
    ));

    let songbird = Songbird::serenity();
    let orchestrator = Arc::new(PlaybackOrchestrator::new(
        SongbirdConnector::new(Arc::clone(&songbird)),
        config.join_timeout,
        config.playback_timeout,
    ));

    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = Client::builder(&config.token, intents)
        .event_handler(Handler::new(resolver, Arc::clone(&orchestrator)))
        .register_songbird_with(songbird)
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    let shutdown_grace = config.shutdown_grace;
    let shutdown_signal = shutdown_signal()?;
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal.await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }

        info!("Shutdown requested, waiting for sounds in flight.");
        orchestrator.shutdown();
        if !orchestrator.drain(shutdown_grace).await {
            warn!(
                "{} sound(s) still playing after {:?}, shutting down anyway",
                orchestrator.in_flight(),
                shutdown_grace
            );
        }
        shard_manager.shutdown_all().await;
    });

    info!("Soundboard is running. Press CTRL-C or send SIGTERM to exit.");
    client.start().await.map_err(Into::into)
}
