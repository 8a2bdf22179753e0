use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::lifecycle;
use crate::models::{Alert, AlertStatus};

/// Read/write seam over the backend alert collection.
pub trait AlertBackend {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>>;
    async fn patch_status(&self, id: i64, status: AlertStatus) -> Result<()>;
}

/// Production backend: the HTTP API, optionally scoped to one student.
pub struct ApiAlertBackend<'a> {
    client: &'a ApiClient,
    student_id: Option<i64>,
}

impl<'a> ApiAlertBackend<'a> {
    pub fn new(client: &'a ApiClient, student_id: Option<i64>) -> Self {
        ApiAlertBackend { client, student_id }
    }
}

impl AlertBackend for ApiAlertBackend<'_> {
    async fn fetch_alerts(&self) -> Result<Vec<Alert>> {
        self.client.list_alerts(self.student_id).await
    }

    async fn patch_status(&self, id: i64, status: AlertStatus) -> Result<()> {
        self.client.update_alert_status(id, status).await
    }
}

/// One view's alert collection, following the mutate-invalidate-reread
/// contract: after any status change the canonical state is whatever the
/// next fetch returns, never a locally patched copy.
pub struct AlertStore<B: AlertBackend> {
    backend: B,
    cached: Option<Vec<Alert>>,
}

impl<B: AlertBackend> AlertStore<B> {
    pub fn new(backend: B) -> Self {
        AlertStore {
            backend,
            cached: None,
        }
    }

    /// Cached collection, fetched on first use.
    pub async fn alerts(&mut self) -> Result<&[Alert]> {
        if self.cached.is_none() {
            self.cached = Some(self.backend.fetch_alerts().await?);
        }
        Ok(self.cached.as_deref().unwrap_or_default())
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub async fn find(&mut self, id: i64) -> Result<Alert> {
        self.alerts()
            .await?
            .iter()
            .find(|alert| alert.id == id)
            .cloned()
            .ok_or(Error::UnknownAlert(id))
    }

    /// Runs the lifecycle guard, then mutates and resynchronizes. An
    /// illegal transition or unknown id fails before any call leaves the
    /// process; a failed mutation leaves the cache as it was.
    pub async fn request_transition(&mut self, id: i64, target: AlertStatus) -> Result<Alert> {
        let current = self.find(id).await?.status;
        lifecycle::ensure_transition(current, target)?;

        self.backend.patch_status(id, target).await?;
        self.invalidate();
        self.find(id).await
    }
}
