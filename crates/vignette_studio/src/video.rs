//! Background video job: start request, status polling and progress messages.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info, instrument, warn};

use vignette_core::{GENERATION_MESSAGES, PanelStatus, VIDEO_SUCCESS_MESSAGE, VideoRequest};
use vignette_error::VignetteResult;

use crate::board::BusyGuard;
use crate::controller::{OperationOutcome, PanelController};

/// Shown when the service reports a failure without a message.
pub const VIDEO_FAILED: &str = "Failed to generate video.";
/// Shown when a finished job carries no video.
pub const VIDEO_MISSING: &str = "Generation finished but no video URL was returned.";

/// Handle on a running video job.
///
/// The job stops when it succeeds or fails, when [`cancel`](Self::cancel) is
/// called, when the handle is dropped, or when the panel is unmounted. There
/// is no attempt limit.
#[derive(Debug)]
pub struct VideoTask {
    token: CancellationToken,
    messages: watch::Receiver<String>,
    handle: JoinHandle<VignetteResult<OperationOutcome>>,
    _guard: DropGuard,
}

impl VideoTask {
    pub(crate) fn spawn(
        controller: PanelController,
        prompt: String,
        request: VideoRequest,
        token: CancellationToken,
        busy: BusyGuard,
    ) -> Self {
        let (sender, messages) = watch::channel(GENERATION_MESSAGES[0].to_string());
        let sender = Arc::new(sender);

        let handle = tokio::spawn(run(
            controller,
            prompt,
            request,
            token.clone(),
            sender,
            busy,
        ));

        Self {
            _guard: token.clone().drop_guard(),
            token,
            messages,
            handle,
        }
    }

    /// Progress message channel.
    pub fn messages(&self) -> watch::Receiver<String> {
        self.messages.clone()
    }

    /// Latest progress message.
    pub fn status_message(&self) -> String {
        self.messages.borrow().clone()
    }

    /// Stop both timers; any later result is discarded.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the job has ended.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the job to end.
    pub async fn wait(self) -> VignetteResult<OperationOutcome> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Video task did not finish");
                Ok(OperationOutcome::Dropped)
            }
        }
    }
}

/// Rotate through the progress messages until `token` is cancelled.
fn spawn_ticker(
    token: CancellationToken,
    period: Duration,
    sender: Arc<watch::Sender<String>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut index = 0;
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    index = (index + 1) % GENERATION_MESSAGES.len();
                    sender.send_replace(GENERATION_MESSAGES[index].to_string());
                }
            }
        }
    })
}

#[instrument(skip_all, fields(panel_id = %controller.panel_id()))]
async fn run(
    controller: PanelController,
    prompt: String,
    request: VideoRequest,
    token: CancellationToken,
    sender: Arc<watch::Sender<String>>,
    _busy: BusyGuard,
) -> VignetteResult<OperationOutcome> {
    let ticker_token = token.child_token();
    let ticker = spawn_ticker(
        ticker_token.clone(),
        controller.settings().video_message_interval(),
        Arc::clone(&sender),
    );

    let outcome = poll_until_done(&controller, &prompt, &request, &token).await;

    ticker_token.cancel();
    if let Err(e) = ticker.await {
        debug!(error = %e, "Ticker ended abnormally");
    }
    if matches!(outcome, Ok(OperationOutcome::Completed)) {
        sender.send_replace(VIDEO_SUCCESS_MESSAGE.to_string());
    }
    outcome
}

async fn poll_until_done(
    controller: &PanelController,
    prompt: &str,
    request: &VideoRequest,
    token: &CancellationToken,
) -> VignetteResult<OperationOutcome> {
    let video = controller.services().video();

    let mut operation = match video.start_video_generation(prompt, request).await {
        Ok(operation) => operation,
        Err(e) => {
            error!(error = %e, "Video generation could not start");
            return Ok(controller.fail(token, &e.user_message())?);
        }
    };
    info!(operation = %operation.name, "Video job started");

    let handle = operation.clone();
    if !controller.apply(token, |panel| {
        panel.video_operation = Some(handle);
        Ok(())
    })? {
        return Ok(OperationOutcome::Dropped);
    }

    let period = controller.settings().video_poll_interval();
    let mut poll = interval_at(Instant::now() + period, period);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Video polling cancelled");
                return Ok(OperationOutcome::Dropped);
            }
            _ = poll.tick() => {}
        }

        let latest = match video.check_video_status(&operation).await {
            Ok(latest) => latest,
            Err(e) => {
                warn!(error = %e, "Video status poll failed");
                return Ok(controller.fail(token, &e.user_message())?);
            }
        };

        if !latest.done {
            debug!("Video still generating");
            let handle = latest.clone();
            if !controller.apply(token, |panel| {
                panel.video_operation = Some(handle);
                Ok(())
            })? {
                return Ok(OperationOutcome::Dropped);
            }
            operation = latest;
            continue;
        }

        if let Some(failure) = &latest.error {
            let message = if failure.message.trim().is_empty() {
                VIDEO_FAILED
            } else {
                failure.message.as_str()
            };
            warn!(code = failure.code, reason = message, "Video job failed");
            return Ok(controller.fail(token, message)?);
        }

        let Some(uri) = latest.video_uri() else {
            warn!("Video job finished without a URI");
            return Ok(controller.fail(token, VIDEO_MISSING)?);
        };

        let video_url = video.authorize_video_uri(uri);
        let finished = latest.clone();
        return if controller.apply(token, |panel| {
            panel.transition(PanelStatus::Complete)?;
            panel.video_url = Some(video_url);
            panel.video_operation = Some(finished);
            Ok(())
        })? {
            info!("Video ready");
            Ok(OperationOutcome::Completed)
        } else {
            Ok(OperationOutcome::Dropped)
        };
    }
}
