use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{Error, Result};
use crate::inbox::NotificationBackend;
use crate::models::{Alert, AlertStatus, NewSelfReport, Notification, SelfReport, Student};

/// Client for the wellness backend. The backend owns all persistence and
/// risk scoring; every method here is a plain JSON round trip with no
/// retries or backoff.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct SubmitResponse {
    report_id: i64,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(format!("{context} returned {status}")));
        }
        response.json().await.map_err(|err| Error::NetworkFailure {
            context: format!("{context}: malformed response body"),
            source: Some(err),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!(path, "GET {path}");
        let mut request = self.authorized(self.http.get(self.endpoint(path)));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await.map_err(|err| Error::NetworkFailure {
            context: format!("GET {path}"),
            source: Some(err),
        })?;
        self.read_json(response, &format!("GET {path}")).await
    }

    fn student_query(student_id: Option<i64>) -> Vec<(&'static str, String)> {
        student_id
            .map(|id| vec![("student_id", id.to_string())])
            .unwrap_or_default()
    }

    pub async fn list_alerts(&self, student_id: Option<i64>) -> Result<Vec<Alert>> {
        self.get_json("/api/alerts", &Self::student_query(student_id))
            .await
    }

    /// Requests the status change and ignores the response body; callers
    /// refetch the collection rather than merging the reply. Timestamps on
    /// the alert are assigned by the backend alone.
    pub async fn update_alert_status(&self, id: i64, status: AlertStatus) -> Result<()> {
        let path = format!("/api/alerts/{id}");
        tracing::debug!(id, status = %status, "PATCH {path}");
        let response = self
            .authorized(self.http.patch(self.endpoint(&path)))
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(|err| Error::NetworkFailure {
                context: format!("PATCH {path}"),
                source: Some(err),
            })?;
        let status_code = response.status();
        if !status_code.is_success() {
            return Err(Error::network(format!("PATCH {path} returned {status_code}")));
        }
        Ok(())
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.get_json("/api/students", &[]).await
    }

    pub async fn list_notifications(&self, student_id: i64) -> Result<Vec<Notification>> {
        self.get_json("/api/notifications", &Self::student_query(Some(student_id)))
            .await
    }

    pub async fn mark_notification_read(&self, id: i64) -> Result<()> {
        let path = format!("/api/notifications/{id}/read");
        tracing::debug!(id, "PUT {path}");
        let response = self
            .authorized(self.http.put(self.endpoint(&path)))
            .send()
            .await
            .map_err(|err| Error::NetworkFailure {
                context: format!("PUT {path}"),
                source: Some(err),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(format!("PUT {path} returned {status}")));
        }
        Ok(())
    }

    pub async fn list_self_reports(&self, student_id: Option<i64>) -> Result<Vec<SelfReport>> {
        self.get_json("/api/self-reports", &Self::student_query(student_id))
            .await
    }

    pub async fn submit_self_report(&self, report: &NewSelfReport) -> Result<i64> {
        let path = "/api/self-report";
        tracing::debug!(student_id = report.student_id, "POST {path}");
        let response = self
            .authorized(self.http.post(self.endpoint(path)))
            .json(report)
            .send()
            .await
            .map_err(|err| Error::NetworkFailure {
                context: format!("POST {path}"),
                source: Some(err),
            })?;
        let submitted: SubmitResponse = self.read_json(response, &format!("POST {path}")).await?;
        Ok(submitted.report_id)
    }
}

impl NotificationBackend for ApiClient {
    async fn mark_read(&self, id: i64) -> Result<()> {
        self.mark_notification_read(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8001/", None);
        assert_eq!(
            client.endpoint("/api/alerts"),
            "http://localhost:8001/api/alerts"
        );

        let bare = ApiClient::new("http://localhost:8001", None);
        assert_eq!(bare.endpoint("/api/students"), "http://localhost:8001/api/students");
    }

    #[test]
    fn student_query_is_empty_when_unscoped() {
        assert!(ApiClient::student_query(None).is_empty());
        assert_eq!(
            ApiClient::student_query(Some(7)),
            vec![("student_id", "7".to_string())]
        );
    }
}
