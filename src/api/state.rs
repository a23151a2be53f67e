//! Application state for the HRMS API.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::error::HrmsResult;
use crate::services::{AuthContext, HrmsContext};

/// Header carrying the caller's login e-mail.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Shared application state.
///
/// Wraps the service context built at startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    context: Arc<HrmsContext>,
}

impl AppState {
    /// Creates the state from a service context.
    pub fn new(context: HrmsContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    /// Returns the service context.
    pub fn context(&self) -> &HrmsContext {
        &self.context
    }

    /// Identifies the caller from the [`USER_EMAIL_HEADER`] header.
    pub async fn authenticate(&self, headers: &HeaderMap) -> HrmsResult<AuthContext> {
        let email = headers
            .get(USER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok());
        self.context.authenticate(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrmsError;
    use crate::services::testing::{admin, context};

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_authenticate_reads_header() {
        let (ctx, _) = context().await;
        ctx.store.users.create(admin("hr@example.sa", "HR")).await.unwrap();
        let state = AppState::new(ctx);

        let mut headers = HeaderMap::new();
        assert!(matches!(
            state.authenticate(&headers).await,
            Err(HrmsError::Unauthenticated { .. })
        ));

        headers.insert(USER_EMAIL_HEADER, "hr@example.sa".parse().unwrap());
        let auth = state.authenticate(&headers).await.unwrap();
        assert!(auth.is_admin());
    }
}
