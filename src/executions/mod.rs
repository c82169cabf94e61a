// Execution-store client. The store is the external system of record for
// execution/step state; the plugin only ever issues single best-effort
// updates against it.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::{StepUpdate, StoreConfig};

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("step update request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("execution store rejected step update: HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Step reporting interface. Exactly one update request per call, no retry;
/// callers must treat any error as fatal to the operation in flight.
#[async_trait]
pub trait StepReporter: Send + Sync {
    async fn update_step(
        &self,
        config: &StoreConfig,
        execution_id: Uuid,
        update: StepUpdate,
    ) -> Result<(), ReporterError>;
}

/// Reporter backed by the execution store's HTTP API.
#[derive(Debug, Default)]
pub struct HttpStepReporter {
    client: reqwest::Client,
}

impl HttpStepReporter {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StepReporter for HttpStepReporter {
    async fn update_step(
        &self,
        config: &StoreConfig,
        execution_id: Uuid,
        update: StepUpdate,
    ) -> Result<(), ReporterError> {
        let url = format!(
            "{}/api/v1/executions/{}/steps/{}",
            config.api_url.trim_end_matches('/'),
            execution_id,
            update.id
        );

        debug!(
            execution_id = %execution_id,
            step_id = %update.id,
            status = ?update.status,
            "Updating execution step"
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&config.token)
            .json(&update)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReporterError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
