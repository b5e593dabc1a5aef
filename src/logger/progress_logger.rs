use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use crate::services::run_coordinator::ProgressCallback;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Progress {
    completed: usize,
    total: usize,
    status: Option<String>,
}

impl Progress {
    fn line(&self, frame: &str) -> String {
        let status = self.status.as_deref().unwrap_or("");
        format!("{frame} [{}/{}] {status}", self.completed, self.total)
    }
}

/// Spinner on stderr that renders the scheduler's progress callbacks.
pub struct ProgressLogger {
    message: String,
    progress: Arc<Mutex<Progress>>,
    stop_sender: Option<mpsc::UnboundedSender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl ProgressLogger {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            progress: Arc::new(Mutex::new(Progress::default())),
            stop_sender: None,
            task_handle: None,
        }
    }

    /// Callback for `ConcurrentAnalysisScheduler::with_progress`.
    pub fn callback(&self) -> ProgressCallback {
        let progress = Arc::clone(&self.progress);
        Arc::new(move |completed, total, status| {
            let mut current = progress.lock().unwrap_or_else(PoisonError::into_inner);
            current.completed = completed;
            current.total = total;
            current.status = status.map(ToString::to_string);
        })
    }

    pub fn start(&mut self) {
        let (stop_tx, mut stop_rx) = mpsc::unbounded_channel::<()>();
        let message = self.message.clone();
        let progress = Arc::clone(&self.progress);

        let handle = tokio::spawn(async move {
            let mut frame = 0;
            let mut interval = tokio::time::interval(tokio::time::Duration::from_millis(150));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let line = progress
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .line(FRAMES[frame]);
                        eprint!("\r\x1b[K{message} {line}");
                        let _ = std::io::stderr().flush();
                        frame = (frame + 1) % FRAMES.len();
                    }
                    _ = stop_rx.recv() => {
                        break;
                    }
                }
            }
        });

        self.stop_sender = Some(stop_tx);
        self.task_handle = Some(handle);
    }

    async fn halt(&mut self) {
        if let Some(sender) = self.stop_sender.take() {
            let _ = sender.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }
    }

    pub async fn stop(&mut self, final_message: &str) {
        self.halt().await;
        eprintln!("\r\x1b[K✅ {final_message}");
    }

    pub async fn error(&mut self, error_message: &str) {
        self.halt().await;
        eprintln!("\r\x1b[K❌ {error_message}");
    }
}
