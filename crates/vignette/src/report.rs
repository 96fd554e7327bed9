//! Plain-text rendering for terminal output.

use vignette_core::{Panel, PanelStatus, StoryStructure};

/// Outline as numbered scenes under the title and logline.
pub fn outline_text(structure: &StoryStructure) -> String {
    let mut text = format!("{}\n{}\n", structure.title, structure.logline);
    for (index, scene) in structure.scenes.iter().enumerate() {
        text.push_str(&format!("\n{}. {}\n   {}\n", index + 1, scene.title, scene.description));
    }
    text
}

/// One-line progress report for a panel.
pub fn status_line(panel: &Panel) -> String {
    match (&panel.status, &panel.error_message) {
        (PanelStatus::Error, Some(message)) => {
            format!("Scene {}: {} ({})", panel.scene_number, panel.status.label(), message)
        }
        _ => format!("Scene {}: {}", panel.scene_number, panel.status.label()),
    }
}
