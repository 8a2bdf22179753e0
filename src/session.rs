use crate::error::{Error, Result};

/// Explicit authenticated-session capability handed to view controllers,
/// replacing the original app's ambient auth context. Queries are scoped by
/// `user_id`; `token` rides along as the bearer credential.
#[derive(Debug, Clone)]
pub struct Session {
    user_id: i64,
    token: String,
}

impl Session {
    pub fn new(user_id: i64, token: String) -> Self {
        Session { user_id, token }
    }

    /// Builds a session from raw environment values. Anything short of a
    /// parseable user id and a non-empty token counts as "not logged in".
    pub fn from_parts(user_id: Option<String>, token: Option<String>) -> Result<Self> {
        let user_id = user_id
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .ok_or(Error::Unauthenticated)?;
        let token = token
            .map(|raw| raw.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(Error::Unauthenticated)?;
        Ok(Session { user_id, token })
    }

    pub fn from_env() -> Result<Self> {
        Session::from_parts(
            std::env::var("WELLNESS_USER_ID").ok(),
            std::env::var("WELLNESS_TOKEN").ok(),
        )
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_parts_build_a_session() {
        let session =
            Session::from_parts(Some("42".to_string()), Some("tok-abc".to_string())).unwrap();
        assert_eq!(session.user_id(), 42);
        assert_eq!(session.token(), "tok-abc");
    }

    #[test]
    fn missing_or_malformed_parts_are_unauthenticated() {
        assert!(matches!(
            Session::from_parts(None, Some("tok".to_string())),
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            Session::from_parts(Some("42".to_string()), None),
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            Session::from_parts(Some("not-a-number".to_string()), Some("tok".to_string())),
            Err(Error::Unauthenticated)
        ));
        assert!(matches!(
            Session::from_parts(Some("42".to_string()), Some("   ".to_string())),
            Err(Error::Unauthenticated)
        ));
    }
}
