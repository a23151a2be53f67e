//! Fixtures for service tests.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::models::{User, UserRole};
use crate::notify::OutboxMailer;
use crate::store::Store;

use super::{AuthContext, HrmsContext};

/// A context over an empty in-memory store with an outbox mailer.
pub async fn context() -> (HrmsContext, OutboxMailer) {
    context_with_gov_api(None).await
}

/// Like [`context`], with both government APIs pointed at `base_url`.
pub async fn context_with_gov_api(base_url: Option<&str>) -> (HrmsContext, OutboxMailer) {
    let mut config = ConfigLoader::load("./config/saudi")
        .expect("Failed to load config")
        .into_config();
    if let Some(base_url) = base_url {
        let integrations = config.integrations_mut();
        integrations.qiwa.base_url = format!("{base_url}/qiwa");
        integrations.sinad.base_url = format!("{base_url}/sinad");
        integrations.qiwa.timeout_secs = 5;
        integrations.sinad.timeout_secs = 5;
    }
    let outbox = OutboxMailer::new();
    let ctx = HrmsContext::new(Store::in_memory(), config, Arc::new(outbox.clone()))
        .expect("Failed to build context");
    (ctx, outbox)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_gov_api(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// An admin account.
pub fn admin(email: &str, department: &str) -> User {
    User {
        id: format!("user_{email}"),
        email: email.to_string(),
        full_name: email.to_string(),
        role: UserRole::Admin,
        department: Some(department.to_string()),
    }
}

/// A non-admin account.
pub fn staff(email: &str) -> User {
    User {
        id: format!("user_{email}"),
        email: email.to_string(),
        full_name: email.to_string(),
        role: UserRole::User,
        department: None,
    }
}

/// Caller identity for `user` without going through the store.
pub fn auth(user: &User) -> AuthContext {
    AuthContext { user: user.clone() }
}
