//! Vignette CLI binary.
//!
//! - Expand an idea into an outline
//! - Generate a full storyboard and export it
//! - Produce video, narration and music for every scene
//! - Inspect prompt templates and record live music

use clap::Parser;
use vignette::{VignetteConfig, init_console_telemetry};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate_outline, print_prompts, produce, record_music, storyboard};

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_console_telemetry(cli.verbose)?;

    let config = VignetteConfig::load()?;

    match cli.command {
        Commands::Outline {
            idea,
            language,
            json,
        } => {
            generate_outline(&config, &idea, language, json).await?;
        }

        Commands::Storyboard(args) => {
            storyboard(&config, &args).await?;
        }

        Commands::Produce(args) => {
            produce(&config, &args).await?;
        }

        Commands::Prompts { language, category } => {
            print_prompts(language.unwrap_or(*config.studio.language()), category);
        }

        Commands::Music(args) => {
            record_music(&config, &args).await?;
        }
    }

    Ok(())
}
