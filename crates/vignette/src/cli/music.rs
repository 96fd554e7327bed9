//! Live music command handler.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};
use tracing::{info, warn};
use vignette::{
    LyriaConnector, MusicConfig, MusicSessionManager, VignetteConfig, VignetteResult,
    write_data_url,
};

use super::MusicArgs;

/// Play `args.prompt` live, then save everything received as WAV.
///
/// Ctrl-C stops early and still saves.
pub async fn record_music(config: &VignetteConfig, args: &MusicArgs) -> VignetteResult<()> {
    let connector = LyriaConnector::new(config)?;
    let mut music = MusicSessionManager::new(Arc::new(connector));

    music.set_prompt(&args.prompt).await?;
    if let Some(bpm) = args.bpm {
        music
            .set_config(MusicConfig {
                bpm: Some(bpm),
                ..MusicConfig::default()
            })
            .await?;
    }

    music.play().await?;
    info!(seconds = args.seconds, "Recording");
    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    tokio::select! {
        _ = sleep_until(deadline) => {}
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Stopping early"),
            Err(e) => {
                warn!(error = %e, "Could not listen for Ctrl-C");
                sleep_until(deadline).await;
            }
        }
    }

    let clip = music.stop().await?;
    write_data_url(&clip, &args.out)?;
    println!("Saved {}", args.out.display());
    Ok(())
}
