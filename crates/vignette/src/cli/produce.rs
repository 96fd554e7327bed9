//! Storyboard and production command handlers.

use futures_util::future::join_all;
use std::collections::HashMap;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tracing::{debug, info, warn};
use vignette::{
    OperationOutcome, PanelController, PanelStatus, ReferenceImage, Storyboard, StudioSession,
    StylePreset, VideoRequest, VignetteConfig, VignetteResult, Voice, export_storyboard,
    outline_text, status_line,
};

use super::{ProduceArgs, StoryboardArgs, new_session};

/// Outline, confirm and generate every panel concurrently.
pub async fn storyboard(config: &VignetteConfig, args: &StoryboardArgs) -> VignetteResult<()> {
    let session = build_storyboard(config, args).await?;
    finish(&session, args)
}

/// Storyboard, then narration, music and video for every panel at once.
pub async fn produce(config: &VignetteConfig, args: &ProduceArgs) -> VignetteResult<()> {
    let mut session = build_storyboard(config, &args.storyboard).await?;
    session.proceed_to_production()?;

    let voice = args.voice.unwrap_or(*config.studio.default_voice());
    let controllers = session.controllers()?;
    let progress = spawn_progress(session.board());
    join_all(
        controllers
            .iter()
            .map(|controller| produce_panel(controller, args, voice)),
    )
    .await;
    progress.abort();

    finish(&session, &args.storyboard)
}

async fn build_storyboard(
    config: &VignetteConfig,
    args: &StoryboardArgs,
) -> VignetteResult<StudioSession> {
    let mut session = new_session(config, args.language)?;
    let structure = session.submit_idea(&args.idea).await?;
    println!("{}", outline_text(&structure));

    let board = session.confirm_structure(structure)?;
    if let Some(aspect_ratio) = args.aspect_ratio {
        board.set_aspect_ratio(aspect_ratio);
    }
    if let Some(style) = &args.style {
        match StylePreset::find(style) {
            Some(preset) => board.apply_preset(preset),
            None => board.set_style_prompt(style.clone()),
        }
    }

    let controllers = session.controllers()?;
    let progress = spawn_progress(Some(&board));
    let outcomes = join_all(controllers.iter().map(PanelController::run_generation)).await;
    progress.abort();

    for (controller, outcome) in controllers.iter().zip(outcomes) {
        report(controller, "generation", outcome);
    }
    info!(complete = board.all_complete(), "Storyboard generated");
    Ok(session)
}

async fn produce_panel(controller: &PanelController, args: &ProduceArgs, voice: Voice) {
    let Some(panel) = controller.panel() else {
        return;
    };

    let narration = async {
        if args.narrate {
            let text = panel.tts_script.clone().or(panel.script.clone()).unwrap_or_default();
            report(controller, "narration", controller.generate_audio(&text, voice).await);
        }
    };

    let music = async {
        if args.music {
            let prompt = args
                .music_prompt
                .clone()
                .unwrap_or_else(|| panel.scene_description.clone());
            report(controller, "music", controller.generate_music(&prompt).await);
        }
    };

    let video = async {
        if args.video {
            let request = VideoRequest {
                image: panel.image_url.as_deref().and_then(ReferenceImage::from_data_url),
                model: args.video_model.clone(),
            };
            let outcome =
                match controller.generate_video(&controller.default_video_prompt(), request) {
                    Ok(Some(task)) => {
                        let ticker = spawn_ticker(panel.scene_number, &task);
                        let outcome = task.wait().await;
                        ticker.abort();
                        outcome
                    }
                    Ok(None) => Ok(OperationOutcome::Skipped),
                    Err(e) => Err(e),
                };
            report(controller, "video", outcome);
        }
    };

    tokio::join!(narration, music, video);
}

fn finish(session: &StudioSession, args: &StoryboardArgs) -> VignetteResult<()> {
    let Some(board) = session.board() else {
        return Ok(());
    };
    for panel in board.panels() {
        println!("{}", status_line(&panel));
    }
    if let Some(dir) = &args.out {
        let summary = export_storyboard(board, dir)?;
        println!(
            "Wrote {} and {} media files",
            summary.record.display(),
            summary.media.len()
        );
    }
    Ok(())
}

fn report(controller: &PanelController, operation: &str, outcome: VignetteResult<OperationOutcome>) {
    let panel_id = controller.panel_id();
    match outcome {
        Ok(OperationOutcome::Completed) => debug!(panel_id, operation, "Done"),
        Ok(OperationOutcome::Failed(message)) => warn!(panel_id, operation, %message, "Failed"),
        Ok(OperationOutcome::Skipped) => debug!(panel_id, operation, "Nothing to do"),
        Ok(OperationOutcome::Dropped) => debug!(panel_id, operation, "Discarded"),
        Err(e) => warn!(panel_id, operation, error = %e, "Rejected"),
    }
}

/// Print a line whenever a panel changes status.
fn spawn_progress(board: Option<&Storyboard>) -> JoinHandle<()> {
    let Some(board) = board else {
        return tokio::spawn(async {});
    };
    let mut events = BroadcastStream::new(board.subscribe());
    tokio::spawn(async move {
        let mut seen: HashMap<String, PanelStatus> = HashMap::new();
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    let panel = event.panel;
                    if seen.insert(panel.id.clone(), panel.status) != Some(panel.status) {
                        println!("{}", status_line(&panel));
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Progress output fell behind");
                }
            }
        }
    })
}

/// Print the rotating video progress messages for one scene.
fn spawn_ticker(scene_number: usize, task: &vignette::VideoTask) -> JoinHandle<()> {
    let mut messages = WatchStream::new(task.messages());
    tokio::spawn(async move {
        while let Some(message) = messages.next().await {
            println!("Scene {}: {}", scene_number, message);
        }
    })
}
