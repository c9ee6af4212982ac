use std::future::Future;
use std::io;

use tracing::info;

/// Future that resolves on Ctrl-C, or on SIGTERM where the platform has it.
///
/// The SIGTERM handler is installed before this returns, so a terminate sent
/// any time after the call is caught rather than killing the process.
pub fn shutdown_signal() -> io::Result<impl Future<Output = io::Result<()>>> {
    #[cfg(unix)]
    let mut terminate = {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate())?
    };

    Ok(async move {
        #[cfg(unix)]
        {
            tokio::select! {
                result = tokio::signal::ctrl_c() => result,
                _ = terminate.recv() => {
                    info!("Received SIGTERM");
                    Ok(())
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await
        }
    })
}
