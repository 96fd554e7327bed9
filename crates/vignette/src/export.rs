//! Write a finished storyboard to disk.
//!
//! Media held as `data:` URLs is decoded into separate files and the JSON
//! record points at those files instead. Remote video links are kept, minus
//! the API key query parameter.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use vignette_core::{AspectRatio, Panel, decode_data_url};
use vignette_error::{IoError, JsonError, VignetteResult};
use vignette_studio::Storyboard;

/// Name of the JSON record inside the output directory.
pub const STORYBOARD_FILE: &str = "storyboard.json";

/// Serialized form of a storyboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardExport {
    /// Story title
    pub title: String,
    /// Story logline
    pub logline: String,
    /// Image aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Global style text
    pub style_prompt: String,
    /// Panels with media replaced by file names
    pub panels: Vec<Panel>,
}

/// What [`export_storyboard`] wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Path of the JSON record
    pub record: PathBuf,
    /// Media files, in panel order
    pub media: Vec<PathBuf>,
}

/// Write `storyboard.json` plus decoded media for every panel into `dir`.
#[instrument(skip(board), fields(dir = %dir.display(), panels = board.len()))]
pub fn export_storyboard(board: &Storyboard, dir: &Path) -> VignetteResult<ExportSummary> {
    std::fs::create_dir_all(dir)
        .map_err(|e| IoError::new(format!("Failed to create {}: {}", dir.display(), e)))?;

    let settings = board.settings();
    let mut summary = ExportSummary::default();
    let mut panels = Vec::new();

    for mut panel in board.panels() {
        let stem = format!("scene-{}", panel.scene_number);
        extract(&mut panel.image_url, dir, &stem, &mut summary.media)?;
        extract(&mut panel.audio_url, dir, &format!("{stem}-narration"), &mut summary.media)?;
        extract(&mut panel.music_url, dir, &format!("{stem}-music"), &mut summary.media)?;
        panel.video_url = panel.video_url.as_deref().map(strip_api_key);
        panel.video_operation = None;
        panels.push(panel);
    }

    let record = StoryboardExport {
        title: board.title().to_string(),
        logline: board.logline().to_string(),
        aspect_ratio: settings.aspect_ratio,
        style_prompt: settings.style_prompt,
        panels,
    };
    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| JsonError::new(format!("Failed to serialize storyboard: {}", e)))?;

    summary.record = dir.join(STORYBOARD_FILE);
    write(&summary.record, json.as_bytes())?;
    info!(media = summary.media.len(), "Storyboard exported");
    Ok(summary)
}

/// Decode a `data:` URL and write its bytes to `path`.
pub fn write_data_url(url: &str, path: &Path) -> VignetteResult<()> {
    let (_, bytes) = decode_data_url(url)
        .ok_or_else(|| IoError::new(format!("Not a base64 data URL: {}", path.display())))?;
    write(path, &bytes)
}

fn extract(
    field: &mut Option<String>,
    dir: &Path,
    stem: &str,
    written: &mut Vec<PathBuf>,
) -> VignetteResult<()> {
    let Some(url) = field.as_deref() else {
        return Ok(());
    };
    let Some((mime_type, bytes)) = decode_data_url(url) else {
        return Ok(());
    };

    let name = format!("{}.{}", stem, extension(&mime_type));
    let path = dir.join(&name);
    write(&path, &bytes)?;
    *field = Some(name);
    written.push(path);
    Ok(())
}

fn write(path: &Path, bytes: &[u8]) -> VignetteResult<()> {
    debug!(path = %path.display(), bytes = bytes.len(), "Writing file");
    std::fs::write(path, bytes)
        .map_err(|e| IoError::new(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(())
}

fn extension(mime_type: &str) -> &str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/mpeg" => "mp3",
        "video/mp4" => "mp4",
        _ => "bin",
    }
}

fn strip_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !param.starts_with("key="))
        .collect();
    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept.join("&"))
    }
}
