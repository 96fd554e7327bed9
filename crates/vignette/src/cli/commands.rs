//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vignette::{AspectRatio, Language, PromptCategory, Voice};

/// Vignette - turn a story idea into a produced storyboard
#[derive(Parser, Debug)]
#[command(name = "vignette")]
#[command(about = "Turn a story idea into a produced storyboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand an idea into a titled, scene-by-scene outline
    Outline {
        /// Story idea
        #[arg(long)]
        idea: String,

        /// Prompt language (en, fa)
        #[arg(long)]
        language: Option<Language>,

        /// Print the outline as JSON
        #[arg(long)]
        json: bool,
    },

    /// Script, prompt and illustrate every scene
    Storyboard(StoryboardArgs),

    /// Build the storyboard, then add video, narration and music
    Produce(ProduceArgs),

    /// Print prompt templates
    Prompts {
        /// Template language (en, fa)
        #[arg(long)]
        language: Option<Language>,

        /// Only this category, e.g. `script` or `imagePrompt`
        #[arg(long)]
        category: Option<PromptCategory>,
    },

    /// Record a live music session to a WAV file
    Music(MusicArgs),
}

/// Options shared by `storyboard` and `produce`
#[derive(Args, Debug, Clone)]
pub struct StoryboardArgs {
    /// Story idea
    #[arg(long)]
    pub idea: String,

    /// Prompt language (en, fa)
    #[arg(long)]
    pub language: Option<Language>,

    /// Image aspect ratio, e.g. 16:9 or 9:16
    #[arg(long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Style preset name or free-form style text
    #[arg(long)]
    pub style: Option<String>,

    /// Directory to write storyboard.json and media into
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Production options
#[derive(Args, Debug, Clone)]
pub struct ProduceArgs {
    #[command(flatten)]
    pub storyboard: StoryboardArgs,

    /// Generate a video for every scene
    #[arg(long)]
    pub video: bool,

    /// Narrate every scene's script
    #[arg(long)]
    pub narrate: bool,

    /// Score every scene
    #[arg(long)]
    pub music: bool,

    /// Narration voice
    #[arg(long)]
    pub voice: Option<Voice>,

    /// Music prompt; defaults to the scene description
    #[arg(long)]
    pub music_prompt: Option<String>,

    /// Video model override
    #[arg(long)]
    pub video_model: Option<String>,
}

/// Live music options
#[derive(Args, Debug, Clone)]
pub struct MusicArgs {
    /// What to play
    #[arg(long)]
    pub prompt: String,

    /// Seconds to record
    #[arg(long, default_value_t = 10)]
    pub seconds: u64,

    /// Beats per minute
    #[arg(long)]
    pub bpm: Option<u32>,

    /// Output WAV file
    #[arg(long, default_value = "music.wav")]
    pub out: PathBuf,
}
