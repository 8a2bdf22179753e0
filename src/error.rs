use crate::models::AlertStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network failure: {context}")]
    NetworkFailure {
        context: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("invalid alert transition {from} -> {to}")]
    InvalidTransition {
        from: AlertStatus,
        to: AlertStatus,
    },
    #[error("cannot compute {0} over an empty report set")]
    EmptyAggregate(&'static str),
    #[error("no alert with id {0}")]
    UnknownAlert(i64),
    #[error("no authenticated session; set WELLNESS_USER_ID and WELLNESS_TOKEN")]
    Unauthenticated,
}

impl Error {
    pub fn network(context: impl Into<String>) -> Self {
        Error::NetworkFailure {
            context: context.into(),
            source: None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::NetworkFailure { .. })
    }
}
