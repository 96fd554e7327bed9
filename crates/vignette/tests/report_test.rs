//! Terminal rendering and logging defaults.

use vignette::{Panel, PanelStatus, Scene, StoryStructure, default_filter, outline_text, status_line};

#[test]
fn outline_lists_numbered_scenes() {
    let structure = StoryStructure {
        title: "Tides".to_string(),
        logline: "A fisherman reads the future in the tide.".to_string(),
        scenes: vec![
            Scene::new("Low tide", "Shells spell a warning."),
            Scene::new("High tide", "The harbour floods."),
        ],
    };

    let text = outline_text(&structure);
    assert!(text.starts_with("Tides\nA fisherman"));
    assert!(text.contains("1. Low tide\n   Shells spell a warning."));
    assert!(text.contains("2. High tide"));
}

#[test]
fn status_line_includes_failure_message() {
    let mut panel = Panel::new(0, "Shells spell a warning.");
    assert_eq!(status_line(&panel), "Scene 1: Ready");

    panel.status = PanelStatus::Error;
    panel.error_message = Some("Failed to generate audio.".to_string());
    assert_eq!(status_line(&panel), "Scene 1: Error (Failed to generate audio.)");
}

#[test]
fn verbose_widens_log_filter() {
    assert_eq!(default_filter(false), "info,vignette=debug");
    assert!(default_filter(true).starts_with("debug"));
}
