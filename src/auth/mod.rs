//! Auth session collaborator
//!
//! Session management (login flows, token refresh, OAuth) lives outside this
//! engine. The analytics code only needs a capability that can identify the
//! current user and hand out a bearer token for catalog requests.

use async_trait::async_trait;

/// Minimal view of the signed-in dashboard user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: String,
    pub email: Option<String>,
}

/// Capability exposed by the hosting application's session layer.
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// Currently signed-in user, if any
    async fn current_user(&self) -> Option<UserInfo>;

    /// Mark the session as signed in as the given user
    async fn login(&self, user: UserInfo);

    /// Clear the session
    async fn logout(&self);

    /// Bearer token to attach to catalog API requests
    fn token(&self) -> Option<String>;
}

/// Session backed by a pre-issued token from configuration.
///
/// Suits headless deployments of the engine (CLI, cron feeds) where the
/// interactive login flow never runs.
pub struct StaticSession {
    token: Option<String>,
    user: tokio::sync::RwLock<Option<UserInfo>>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            user: tokio::sync::RwLock::new(None),
        }
    }
}

#[async_trait]
impl AuthSession for StaticSession {
    async fn current_user(&self) -> Option<UserInfo> {
        self.user.read().await.clone()
    }

    async fn login(&self, user: UserInfo) {
        *self.user.write().await = Some(user);
    }

    async fn logout(&self) {
        *self.user.write().await = None;
    }

    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}
