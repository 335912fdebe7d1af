use std::sync::Arc;

use tokio::{runtime::Handle, sync::oneshot};
use tracing::{info, instrument, warn};

use crate::{
    config::ExtractorProfile,
    error::ExtractError,
    extractor::{ExtractionJob, Extractor},
    model::{DownloadOutcome, DownloadRequest},
};

/// Runs the extraction jobs of a request one after another.
pub struct Orchestrator<E> {
    extractor: E,
    profile: ExtractorProfile,
}

impl<E: Extractor> Orchestrator<E> {
    pub fn new(extractor: E, profile: ExtractorProfile) -> Self {
        Self { extractor, profile }
    }

    /// Downloads every requested format. The first failing job ends the run
    /// and its message becomes the outcome.
    #[instrument(skip_all, fields(url = request.url()))]
    pub async fn execute(&self, request: DownloadRequest) -> DownloadOutcome {
        match self.run(&request).await {
            Ok(()) => {
                info!("download finished");
                DownloadOutcome::Success
            }
            Err(err) => {
                warn!("download failed: {err}");
                DownloadOutcome::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn run(&self, request: &DownloadRequest) -> Result<(), ExtractError> {
        for job in ExtractionJob::plan(&self.profile, request) {
            info!(kind = ?job.kind, "starting extraction");
            self.extractor.extract(&job).await?;
        }
        Ok(())
    }
}

/// Spawns `request` on the runtime behind `handle`. The outcome arrives on
/// the returned receiver, after which `notify` is called.
pub fn spawn_download<E, F>(
    handle: &Handle,
    orchestrator: Arc<Orchestrator<E>>,
    request: DownloadRequest,
    notify: F,
) -> oneshot::Receiver<DownloadOutcome>
where
    E: Extractor + 'static,
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    handle.spawn(async move {
        let outcome = orchestrator.execute(request).await;
        // The receiver is gone only when the window has closed
        let _ = tx.send(outcome);
        notify();
    });
    rx
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::extractor::MediaKind;
    use crate::model::Formats;

    /// Records every job and fails the ones listed in `fail_on`.
    #[derive(Default)]
    struct Scripted {
        calls: Mutex<Vec<MediaKind>>,
        fail_on: Option<MediaKind>,
    }

    #[async_trait]
    impl Extractor for Arc<Scripted> {
        async fn extract(&self, job: &ExtractionJob) -> Result<(), ExtractError> {
            self.calls.lock().unwrap().push(job.kind);
            if self.fail_on == Some(job.kind) {
                return Err(ExtractError::Failed(format!(
                    "ERROR: {:?} step broke",
                    job.kind
                )));
            }
            Ok(())
        }
    }

    fn request(audio: bool, video: bool) -> DownloadRequest {
        DownloadRequest::new(
            "https://youtu.be/abc123",
            std::env::temp_dir(),
            Formats { audio, video },
        )
        .unwrap()
    }

    fn orchestrator(script: &Arc<Scripted>) -> Orchestrator<Arc<Scripted>> {
        Orchestrator::new(Arc::clone(script), ExtractorProfile::default())
    }

    #[tokio::test]
    async fn audio_runs_before_video() {
        let script = Arc::new(Scripted::default());
        let outcome = orchestrator(&script).execute(request(true, true)).await;

        assert_eq!(outcome, DownloadOutcome::Success);
        assert_eq!(
            *script.calls.lock().unwrap(),
            [MediaKind::Audio, MediaKind::Video]
        );
    }

    #[tokio::test]
    async fn audio_failure_skips_video() {
        let script = Arc::new(Scripted {
            fail_on: Some(MediaKind::Audio),
            ..Default::default()
        });
        let outcome = orchestrator(&script).execute(request(true, true)).await;

        assert_eq!(
            outcome,
            DownloadOutcome::Failure {
                message: "ERROR: Audio step broke".to_string()
            }
        );
        assert_eq!(*script.calls.lock().unwrap(), [MediaKind::Audio]);
    }

    #[tokio::test]
    async fn video_only_request_runs_one_job() {
        let script = Arc::new(Scripted::default());
        let outcome = orchestrator(&script).execute(request(false, true)).await;

        assert_eq!(outcome, DownloadOutcome::Success);
        assert_eq!(*script.calls.lock().unwrap(), [MediaKind::Video]);
    }

    #[tokio::test]
    async fn video_failure_after_audio_is_reported() {
        let script = Arc::new(Scripted {
            fail_on: Some(MediaKind::Video),
            ..Default::default()
        });
        let outcome = orchestrator(&script).execute(request(true, true)).await;

        assert!(matches!(outcome, DownloadOutcome::Failure { .. }));
        assert_eq!(
            *script.calls.lock().unwrap(),
            [MediaKind::Audio, MediaKind::Video]
        );
    }

    #[tokio::test]
    async fn spawned_download_delivers_outcome_then_notifies() {
        let script = Arc::new(Scripted::default());
        let notified = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&notified);

        let rx = spawn_download(
            &Handle::current(),
            Arc::new(orchestrator(&script)),
            request(true, false),
            move || flag.store(true, Ordering::SeqCst),
        );

        assert_eq!(rx.await.unwrap(), DownloadOutcome::Success);
        // send and notify run without a yield in between
        assert!(notified.load(Ordering::SeqCst));
    }
}
