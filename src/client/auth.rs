//! Login and registration

use super::{AuthError, RagClient};
use serde::Serialize;
use std::fmt;

/// Which account endpoint was called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn path(self) -> [&'static str; 2] {
        match self {
            AuthAction::Login => ["auth", "login"],
            AuthAction::Register => ["auth", "register"],
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthAction::Login => write!(f, "Login"),
            AuthAction::Register => write!(f, "Registration"),
        }
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl RagClient {
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.authenticate(AuthAction::Login, username, password).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        self.authenticate(AuthAction::Register, username, password)
            .await
    }

    async fn authenticate(
        &self,
        action: AuthAction,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url(&action.path()))
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(|source| AuthError::Request { action, source })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(%username, action = %action, "Authenticated");
            Ok(())
        } else {
            tracing::warn!(%username, action = %action, status = %status, "Authentication rejected");
            Err(AuthError::Rejected { action, status })
        }
    }
}
