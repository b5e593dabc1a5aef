use std::path::PathBuf;
use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::structs::domain_event::DomainEvent;
use crate::traits::event_handler::EventHandler;

/// Logs every domain event; optionally appends it as a JSON line to an audit file.
///
/// With an audit file configured the handler is deferred, so file writes run
/// alongside other deferred subscribers rather than blocking the immediate ones.
pub struct EventAuditLogger {
    audit_file: Option<PathBuf>,
}

impl EventAuditLogger {
    pub const fn log_only() -> Self {
        Self { audit_file: None }
    }

    pub fn with_audit_file(path: impl Into<PathBuf>) -> Self {
        Self {
            audit_file: Some(path.into()),
        }
    }

    async fn append(&self, path: &PathBuf, line: &str) -> OrganizerResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| OrganizerError::io_error(&format!("open {}", path.display()), &e.to_string()))?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for EventAuditLogger {
    fn name(&self) -> &str {
        "event-audit-logger"
    }

    async fn handle(&self, event: &DomainEvent) -> OrganizerResult<()> {
        let record = event.to_record();
        let line = serde_json::to_string(&record)?;
        log::debug!("📣 {} for {}: {line}", record.event_type, record.aggregate_id);

        match &self.audit_file {
            Some(path) => self.append(path, &line).await,
            None => Ok(()),
        }
    }

    fn is_deferred(&self) -> bool {
        self.audit_file.is_some()
    }
}
