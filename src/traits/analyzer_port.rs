use async_trait::async_trait;
use crate::errors::OrganizerResult;
use crate::helpers::analysis_record_builder::AnalysisRecord;
use crate::structs::analysis_result::AnalysisResult;

/// Turns a flat repository record into a structured analysis.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyzerPort: Send + Sync {
    async fn analyze(&self, record: &AnalysisRecord) -> OrganizerResult<AnalysisResult>;
}
