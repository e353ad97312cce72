//! Authorization guard.
//!
//! Resolves the caller and checks it against the self-or-admin and
//! admin-only rules.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use common::{AppError, AppResult};
use domain::{CallerContext, User};

use super::UserService;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Authorization service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Succeed when the caller is the target user or an administrator
    async fn require_self_or_admin(&self, ctx: &CallerContext, user_id: i64) -> AppResult<()>;

    /// Succeed when the caller is an administrator; returns the caller
    async fn require_admin(&self, ctx: &CallerContext) -> AppResult<User>;
}

/// Concrete implementation of AuthService backed by the user directory.
pub struct Authorizer {
    users: Arc<dyn UserService>,
}

impl Authorizer {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthService for Authorizer {
    async fn require_self_or_admin(&self, ctx: &CallerContext, user_id: i64) -> AppResult<()> {
        let caller = self.users.current_caller(ctx).await?;

        if caller.is_self_or_admin(user_id) {
            Ok(())
        } else {
            warn!(caller_id = caller.id, target_id = user_id, "Access denied");
            Err(AppError::Forbidden)
        }
    }

    async fn require_admin(&self, ctx: &CallerContext) -> AppResult<User> {
        let caller = self.users.current_caller(ctx).await?;

        if caller.is_admin() {
            Ok(caller)
        } else {
            warn!(caller_id = caller.id, "Administrator role required");
            Err(AppError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::factory::{admin_user, client_user};
    use crate::service::MockUserService;

    fn guard_for(user: User) -> Authorizer {
        let mut users = MockUserService::new();
        users
            .expect_current_caller()
            .returning(move |_| Ok(user.clone()));
        Authorizer::new(Arc::new(users))
    }

    fn ctx() -> CallerContext {
        CallerContext::authenticated("someone@gmail.com")
    }

    #[tokio::test]
    async fn test_self_is_allowed() {
        let guard = guard_for(client_user());
        assert!(guard.require_self_or_admin(&ctx(), 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_is_allowed_for_other_user() {
        let guard = guard_for(admin_user());
        assert!(guard.require_self_or_admin(&ctx(), 1).await.is_ok());
    }

    #[tokio::test]
    async fn test_other_client_is_forbidden() {
        let guard = guard_for(client_user());
        let result = guard.require_self_or_admin(&ctx(), 2).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_unauthenticated_propagates() {
        let mut users = MockUserService::new();
        users
            .expect_current_caller()
            .returning(|_| Err(AppError::Unauthorized));
        let guard = Authorizer::new(Arc::new(users));

        let result = guard
            .require_self_or_admin(&CallerContext::anonymous(), 1)
            .await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_require_admin() {
        assert!(guard_for(admin_user()).require_admin(&ctx()).await.is_ok());

        let result = guard_for(client_user()).require_admin(&ctx()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
