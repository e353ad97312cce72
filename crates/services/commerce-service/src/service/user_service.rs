//! User directory service.
//!
//! Users are read as (user, role) projection rows and folded into one
//! aggregate per login, so a user with several roles is returned once with
//! the union of its roles.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use common::{AppError, AppResult};
use domain::{assemble_users, CallerContext, User, UserRoleRow};

use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Load a user with all its roles by login (email)
    async fn find_by_login_id(&self, login: &str) -> AppResult<User>;

    /// Resolve the user behind the caller context.
    /// Fails with `Unauthorized` when no login is present or it no longer
    /// resolves to a user.
    async fn current_caller(&self, ctx: &CallerContext) -> AppResult<User>;

    /// The caller's own profile
    async fn get_me(&self, ctx: &CallerContext) -> AppResult<User>;

    /// Load a user with all its roles by id
    async fn find_by_id(&self, id: i64) -> AppResult<User>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

/// Fold the rows of a single user; no rows means no user.
fn single_user(rows: Vec<UserRoleRow>) -> AppResult<User> {
    assemble_users(rows).into_iter().next().ok_or(AppError::NotFound)
}

#[async_trait]
impl UserService for UserManager {
    async fn find_by_login_id(&self, login: &str) -> AppResult<User> {
        let rows = self.repo.search_user_and_roles_by_email(login).await?;
        single_user(rows)
    }

    async fn current_caller(&self, ctx: &CallerContext) -> AppResult<User> {
        let login = ctx.login().ok_or(AppError::Unauthorized)?;

        match self.find_by_login_id(login).await {
            Err(AppError::NotFound) => {
                debug!(login, "Authenticated login no longer resolves to a user");
                Err(AppError::Unauthorized)
            }
            other => other,
        }
    }

    async fn get_me(&self, ctx: &CallerContext) -> AppResult<User> {
        self.current_caller(ctx).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<User> {
        let rows = self.repo.search_user_and_roles_by_id(id).await?;
        single_user(rows)
    }
}
