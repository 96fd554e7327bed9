//! Panel pipeline and side operation tests.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use test_utils::{MockCall, MockPoll, MockStudioBackend, board, controller, prompts, studio_kind};
use vignette_core::{PanelStatus, PromptCategory, VideoRequest, Voice};
use vignette_error::StudioErrorKind;
use vignette_studio::{
    AUDIO_FAILED, BoardSettings, GENERATION_FAILED, IMAGE_FAILED, MUSIC_FAILED,
    OperationOutcome, PanelController, Services,
};

#[tokio::test]
async fn generation_streams_script_then_completes() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let mut events = board.subscribe();
    let panel = controller(&board, "scene-0", &mock)?;

    let outcome = panel.run_generation().await?;
    assert_eq!(outcome, OperationOutcome::Completed);

    let mut scripts: Vec<String> = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let Some(script) = event.panel.script {
            if scripts.last() != Some(&script) {
                scripts.push(script);
            }
        }
    }
    assert_eq!(scripts, vec!["A", "AB", "ABC"]);

    let done = panel.panel().expect("panel exists");
    assert_eq!(done.status, PanelStatus::Complete);
    assert_eq!(done.script.as_deref(), Some("ABC"));
    assert_eq!(done.tts_script, done.script);
    assert_eq!(
        done.image_prompt,
        Some(format!("ABC | {}", BoardSettings::default().style_prompt))
    );
    assert!(done.image_url.expect("image").starts_with("data:image/jpeg"));
    assert!(done.error_message.is_none());
    assert_eq!(mock.calls(MockCall::Script), 1);
    assert_eq!(mock.calls(MockCall::Image), 1);
    Ok(())
}

#[tokio::test]
async fn generation_uses_active_script_template() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let shared = prompts();
    shared
        .write()
        .unwrap()
        .update_prompt(PromptCategory::Script, "Write {{scene}} as verse.");
    let panel = PanelController::mount(
        board.clone(),
        "scene-1",
        test_utils::services(&mock),
        shared,
        Default::default(),
    )?;

    panel.run_generation().await?;
    assert_eq!(
        mock.last_template(MockCall::Script).as_deref(),
        Some("Write {{scene}} as verse.")
    );
    Ok(())
}

#[tokio::test]
async fn failed_image_prompt_keeps_partial_script() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().failing(MockCall::ImagePrompt));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;

    let outcome = panel.run_generation().await?;
    assert_eq!(outcome, OperationOutcome::Failed(GENERATION_FAILED.to_string()));

    let failed = panel.panel().expect("panel exists");
    assert_eq!(failed.status, PanelStatus::Error);
    assert_eq!(failed.error_message.as_deref(), Some(GENERATION_FAILED));
    assert_eq!(failed.script.as_deref(), Some("ABC"));
    assert!(failed.image_prompt.is_none());
    assert_eq!(mock.calls(MockCall::Image), 0);
    Ok(())
}

#[tokio::test]
async fn failed_script_request_marks_panel() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().failing(MockCall::Script));
    let board = board();
    let panel = controller(&board, "scene-2", &mock)?;

    let outcome = panel.run_generation().await?;
    assert_eq!(outcome, OperationOutcome::Failed(GENERATION_FAILED.to_string()));
    assert_eq!(panel.panel().expect("panel").status, PanelStatus::Error);
    assert_eq!(mock.calls(MockCall::ImagePrompt), 0);
    Ok(())
}

#[tokio::test]
async fn generation_requires_pending_panel() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    let err = panel.run_generation().await.unwrap_err();
    assert!(matches!(
        studio_kind(&err),
        Some(StudioErrorKind::InvalidTransition { .. })
    ));
    assert_eq!(mock.calls(MockCall::Script), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unmount_drops_remaining_stages() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().with_fragment_delay(Duration::from_secs(1)));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;

    let running = tokio::spawn({
        let panel = panel.clone();
        async move { panel.run_generation().await }
    });

    tokio::time::sleep(Duration::from_millis(1500)).await;
    panel.unmount();
    let outcome = running.await??;

    assert_eq!(outcome, OperationOutcome::Dropped);
    let snapshot = board.panel("scene-0").expect("panel exists");
    assert_eq!(snapshot.script.as_deref(), Some("A"));
    assert_eq!(snapshot.status, PanelStatus::Scripting);
    assert_eq!(mock.calls(MockCall::ImagePrompt), 0);
    assert_eq!(mock.calls(MockCall::Image), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn concurrent_generation_is_rejected() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().with_fragment_delay(Duration::from_millis(200)));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;

    let running = tokio::spawn({
        let panel = panel.clone();
        async move { panel.run_generation().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = panel.run_generation().await.unwrap_err();
    assert!(matches!(studio_kind(&err), Some(StudioErrorKind::Busy { .. })));

    assert_eq!(running.await??, OperationOutcome::Completed);
    assert_eq!(mock.calls(MockCall::Script), 1);
    Ok(())
}

#[tokio::test]
async fn blank_inputs_are_skipped() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;

    assert_eq!(panel.regenerate_image("   ").await?, OperationOutcome::Skipped);
    assert_eq!(panel.generate_audio("", Voice::Kore).await?, OperationOutcome::Skipped);
    assert_eq!(panel.generate_music("\n").await?, OperationOutcome::Skipped);

    assert_eq!(panel.panel().expect("panel").status, PanelStatus::Pending);
    assert_eq!(mock.calls(MockCall::Image), 0);
    assert_eq!(mock.calls(MockCall::Speech), 0);
    assert_eq!(mock.calls(MockCall::Music), 0);
    Ok(())
}

#[tokio::test]
async fn side_operations_need_a_settled_panel() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;

    let err = panel.generate_audio("Hello there", Voice::Puck).await.unwrap_err();
    assert!(matches!(
        studio_kind(&err),
        Some(StudioErrorKind::InvalidTransition { .. })
    ));
    assert_eq!(mock.calls(MockCall::Speech), 0);
    Ok(())
}

#[tokio::test]
async fn narration_and_music_fill_their_fields() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-1", &mock)?;
    panel.run_generation().await?;

    let outcome = panel.generate_audio("The hill goes dark.", Voice::Kore).await?;
    assert_eq!(outcome, OperationOutcome::Completed);
    let outcome = panel.generate_music("slow strings").await?;
    assert_eq!(outcome, OperationOutcome::Completed);

    let done = panel.panel().expect("panel");
    assert_eq!(done.status, PanelStatus::Complete);
    assert_eq!(done.tts_voice, Some(Voice::Kore));
    assert!(done.audio_url.expect("audio").starts_with("data:audio/wav"));
    assert_eq!(done.music_prompt.as_deref(), Some("slow strings"));
    assert!(done.music_url.is_some());

    let english = prompts();
    let english = english.read().unwrap();
    assert_eq!(
        mock.last_template(MockCall::Speech).as_deref(),
        Some(english.prompt(PromptCategory::Tts))
    );
    assert_eq!(
        mock.last_template(MockCall::Music).as_deref(),
        Some(english.prompt(PromptCategory::Music))
    );
    Ok(())
}

#[tokio::test]
async fn failed_side_operations_use_fixed_messages() -> anyhow::Result<()> {
    let mock = Arc::new(
        MockStudioBackend::new()
            .failing(MockCall::Speech)
            .failing(MockCall::Music),
    );
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    assert_eq!(
        panel.generate_audio("Line", Voice::Puck).await?,
        OperationOutcome::Failed(AUDIO_FAILED.to_string())
    );
    assert_eq!(
        panel.panel().expect("panel").error_message.as_deref(),
        Some(AUDIO_FAILED)
    );

    assert_eq!(
        panel.generate_music("drums").await?,
        OperationOutcome::Failed(MUSIC_FAILED.to_string())
    );
    let failed = panel.panel().expect("panel");
    assert_eq!(failed.status, PanelStatus::Error);
    assert!(failed.music_url.is_none());
    Ok(())
}

#[tokio::test]
async fn music_retry_clears_earlier_failure() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().failing(MockCall::Speech));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    panel.generate_audio("Line", Voice::Puck).await?;
    assert_eq!(
        panel.panel().expect("panel").error_message.as_deref(),
        Some(AUDIO_FAILED)
    );

    assert_eq!(
        panel.generate_music("calm piano").await?,
        OperationOutcome::Completed
    );
    let done = panel.panel().expect("panel");
    assert_eq!(done.status, PanelStatus::Complete);
    assert!(done.error_message.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn narration_runs_during_image_regeneration() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().with_image_delay(Duration::from_secs(5)));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    let regenerating = panel.clone();
    let regeneration =
        tokio::spawn(async move { regenerating.regenerate_image("a lamp in fog").await });
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(panel.panel().expect("panel").status, PanelStatus::Imaging);

    let outcome = panel.generate_audio("The lamp flickers.", Voice::Puck).await?;
    assert_eq!(outcome, OperationOutcome::Completed);
    assert_eq!(regeneration.await??, OperationOutcome::Completed);

    let done = panel.panel().expect("panel");
    assert_eq!(done.status, PanelStatus::Complete);
    assert!(done.audio_url.is_some());
    assert_eq!(mock.calls(MockCall::Image), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn narration_runs_during_video_job() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().with_polls(vec![
        MockPoll::Pending,
        MockPoll::Done("https://video.test/lamp.mp4".to_string()),
    ]));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    let task = panel
        .generate_video("slow push in", VideoRequest::default())?
        .expect("task started");
    let outcome = panel.generate_audio("Dawn breaks.", Voice::Kore).await?;
    assert_eq!(outcome, OperationOutcome::Completed);
    assert_eq!(task.wait().await?, OperationOutcome::Completed);

    let done = panel.panel().expect("panel");
    assert_eq!(done.status, PanelStatus::Complete);
    assert!(done.audio_url.is_some());
    assert!(done.video_url.is_some());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn side_operations_wait_for_main_pipeline() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().with_image_delay(Duration::from_secs(5)));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;

    let generating = panel.clone();
    let generation = tokio::spawn(async move { generating.run_generation().await });
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(panel.panel().expect("panel").status, PanelStatus::Imaging);

    let err = panel.generate_audio("Too early", Voice::Puck).await.unwrap_err();
    assert!(matches!(
        studio_kind(&err),
        Some(StudioErrorKind::InvalidTransition { .. })
    ));
    let err = panel.regenerate_image("another lamp").await.unwrap_err();
    assert!(matches!(
        studio_kind(&err),
        Some(StudioErrorKind::InvalidTransition { .. })
    ));

    assert_eq!(generation.await??, OperationOutcome::Completed);
    assert_eq!(mock.calls(MockCall::Speech), 0);
    assert_eq!(mock.calls(MockCall::Image), 1);
    Ok(())
}

#[tokio::test]
async fn image_regeneration_recovers_from_error() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new().failing(MockCall::Speech));
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;
    let original_prompt = panel.panel().expect("panel").image_prompt;

    panel.generate_audio("Line", Voice::Puck).await?;
    assert_eq!(panel.panel().expect("panel").status, PanelStatus::Error);

    let outcome = panel.regenerate_image("a lamp in heavy rain").await?;
    assert_eq!(outcome, OperationOutcome::Completed);

    let done = panel.panel().expect("panel");
    assert_eq!(done.status, PanelStatus::Complete);
    assert!(done.error_message.is_none());
    assert_eq!(done.image_prompt, original_prompt);
    assert_eq!(mock.calls(MockCall::Image), 2);
    Ok(())
}

#[tokio::test]
async fn failed_image_regeneration_reports() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    let failing = Arc::new(MockStudioBackend::new().failing(MockCall::Image));
    let retry = PanelController::mount(
        board.clone(),
        "scene-0",
        Services::from_client(failing.clone(), failing.clone()),
        prompts(),
        Default::default(),
    )?;
    assert_eq!(
        retry.regenerate_image("night").await?,
        OperationOutcome::Failed(IMAGE_FAILED.to_string())
    );
    Ok(())
}

#[tokio::test]
async fn unmounted_controller_refuses_work() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    let other_handle = panel.clone();
    panel.unmount();

    assert!(other_handle.is_unmounted());
    let err = other_handle.run_generation().await.unwrap_err();
    assert!(matches!(studio_kind(&err), Some(StudioErrorKind::Unmounted(_))));
    assert_eq!(mock.calls(MockCall::Script), 0);
    Ok(())
}

#[tokio::test]
async fn mounting_unknown_panel_fails() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let err = controller(&board(), "scene-9", &mock).unwrap_err();
    assert!(err.to_string().contains("scene-9"));
    Ok(())
}

#[tokio::test]
async fn default_video_prompt_wraps_image_prompt() -> anyhow::Result<()> {
    let mock = Arc::new(MockStudioBackend::new());
    let board = board();
    let panel = controller(&board, "scene-0", &mock)?;
    panel.run_generation().await?;

    let image_prompt = panel.panel().expect("panel").image_prompt.expect("prompt");
    assert!(panel.default_video_prompt().contains(&image_prompt));
    Ok(())
}
