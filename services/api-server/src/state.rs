use std::sync::Arc;

use flexiflo_database::{DocumentRepository, DocumentService};
use flexiflo_models::{DocumentKind, FinalInspectionReport, JobSheet};
use flexiflo_utils::AppConfig;

use crate::metrics::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub jobs: DocumentService<JobSheet>,
    pub reports: DocumentService<FinalInspectionReport>,
    pub metrics: Arc<Metrics>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        jobs: Arc<dyn DocumentRepository<JobSheet>>,
        reports: Arc<dyn DocumentRepository<FinalInspectionReport>>,
        config: AppConfig,
    ) -> Result<Self, prometheus::Error> {
        let metrics = Metrics::new(&config.monitoring.prometheus_namespace)?;
        Ok(Self {
            jobs: DocumentService::new(jobs),
            reports: DocumentService::new(reports),
            metrics: Arc::new(metrics),
            config,
        })
    }
}

/// A record type served over HTTP.
pub trait Resource: DocumentKind {
    fn service(state: &AppState) -> &DocumentService<Self>;
}

impl Resource for JobSheet {
    fn service(state: &AppState) -> &DocumentService<Self> {
        &state.jobs
    }
}

impl Resource for FinalInspectionReport {
    fn service(state: &AppState) -> &DocumentService<Self> {
        &state.reports
    }
}
