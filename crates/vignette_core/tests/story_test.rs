use vignette_core::{NO_DESCRIPTION, PanelStatus, Scene, StoryStructure};
use vignette_error::StudioErrorKind;

fn outline(descriptions: &[&str]) -> StoryStructure {
    StoryStructure {
        title: "Tide".to_string(),
        logline: "A fisher races the tide.".to_string(),
        scenes: descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| Scene::new(format!("Scene {}", i + 1), *d))
            .collect(),
    }
}

#[test]
fn one_pending_panel_per_scene() {
    let story = outline(&["Dawn at the harbor", "Storm rolls in", "Safe return"]);
    let panels = story.to_panels();

    assert_eq!(panels.len(), story.scenes.len());
    for (i, panel) in panels.iter().enumerate() {
        assert_eq!(panel.id, format!("scene-{i}"));
        assert_eq!(panel.scene_number, i + 1);
        assert_eq!(panel.scene_description, story.scenes[i].description);
        assert_eq!(panel.status, PanelStatus::Pending);
        assert!(panel.script.is_none());
        assert!(panel.image_url.is_none());
    }
}

#[test]
fn blank_description_gets_placeholder() {
    let panels = outline(&["", "  \n"]).to_panels();
    assert!(panels.iter().all(|p| p.scene_description == NO_DESCRIPTION));
}

#[test]
fn empty_outline_is_invalid() {
    let err = outline(&[]).validate().unwrap_err();
    assert_eq!(*err.kind(), StudioErrorKind::InvalidStructure);
    assert_eq!(
        err.kind().to_string(),
        "The generated story structure is invalid. Please try again."
    );
}

#[test]
fn outline_json_tolerates_missing_fields() -> anyhow::Result<()> {
    let story: StoryStructure = serde_json::from_str(r#"{"title": "Only a title"}"#)?;
    assert!(story.scenes.is_empty());
    assert!(story.validate().is_err());
    Ok(())
}
