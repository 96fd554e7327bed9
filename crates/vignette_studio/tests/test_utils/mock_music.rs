//! Mock live music connector recording every command.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vignette_error::{GeminiError, GeminiErrorKind, VignetteResult};
use vignette_interface::{MusicConfig, MusicConnector, MusicSession, WeightedPrompt};

/// How sessions opened by the connector behave.
#[derive(Debug, Clone, Default)]
pub struct MockSessionBehavior {
    /// Chunks every session has buffered
    pub chunks: Vec<Vec<u8>>,
    /// Make `stop` fail
    pub fail_stop: bool,
}

/// Connector whose sessions log commands to a shared list.
#[derive(Debug, Clone, Default)]
pub struct MockMusicConnector {
    behavior: MockSessionBehavior,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockMusicConnector {
    pub fn new(behavior: MockSessionBehavior) -> Self {
        Self {
            behavior,
            log: Arc::default(),
        }
    }

    /// Every command so far, in order.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, command: &str) -> usize {
        self.log().iter().filter(|entry| entry.as_str() == command).count()
    }
}

#[async_trait]
impl MusicConnector for MockMusicConnector {
    async fn connect(&self) -> VignetteResult<Box<dyn MusicSession>> {
        self.log.lock().unwrap().push("connect".to_string());
        Ok(Box::new(MockMusicSession {
            chunks: self.behavior.chunks.clone(),
            fail_stop: self.behavior.fail_stop,
            log: Arc::clone(&self.log),
        }))
    }
}

struct MockMusicSession {
    chunks: Vec<Vec<u8>>,
    fail_stop: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockMusicSession {
    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl MusicSession for MockMusicSession {
    async fn set_weighted_prompts(&mut self, prompts: &[WeightedPrompt]) -> VignetteResult<()> {
        let joined = prompts
            .iter()
            .map(|p| format!("{}@{}", p.text, p.weight))
            .collect::<Vec<_>>()
            .join(",");
        self.push(format!("prompts:{}", joined));
        Ok(())
    }

    async fn set_music_config(&mut self, config: &MusicConfig) -> VignetteResult<()> {
        self.push(format!("config:{:?}", config.bpm));
        Ok(())
    }

    async fn play(&mut self) -> VignetteResult<()> {
        self.push("play".to_string());
        Ok(())
    }

    async fn pause(&mut self) -> VignetteResult<()> {
        self.push("pause".to_string());
        Ok(())
    }

    async fn stop(&mut self) -> VignetteResult<()> {
        self.push("stop".to_string());
        if self.fail_stop {
            return Err(GeminiError::new(GeminiErrorKind::StreamInterrupted(
                "socket reset".to_string(),
            ))
            .into());
        }
        Ok(())
    }

    fn drain_audio(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.chunks)
    }

    async fn close(&mut self) -> VignetteResult<()> {
        self.push("close".to_string());
        Ok(())
    }
}
