//! User repository implementation.
//!
//! Users are read through a flat projection: one row per (user, role)
//! pair. Folding the rows into aggregates happens in the service layer.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

use super::entities::role;
use super::entities::user::{self, Entity as UserEntity};
use super::entities::user_role;
use common::{AppError, AppResult};
use domain::UserRoleRow;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Projection rows for the user with this login (email).
    /// Empty when no such user exists.
    async fn search_user_and_roles_by_email(&self, email: &str) -> AppResult<Vec<UserRoleRow>>;

    /// Projection rows for the user with this id
    async fn search_user_and_roles_by_id(&self, id: i64) -> AppResult<Vec<UserRoleRow>>;
}

#[derive(Debug, FromQueryResult)]
struct UserRoleRecord {
    user_id: i64,
    name: String,
    email: String,
    phone: String,
    birth_date: Option<NaiveDate>,
    password_hash: String,
    role_id: i64,
    authority: String,
}

impl From<UserRoleRecord> for UserRoleRow {
    fn from(record: UserRoleRecord) -> Self {
        Self {
            user_id: record.user_id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            birth_date: record.birth_date,
            password_hash: record.password_hash,
            role_id: record.role_id,
            authority: record.authority,
        }
    }
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn projection() -> Select<UserEntity> {
        UserEntity::find()
            .select_only()
            .column_as(user::Column::Id, "user_id")
            .column(user::Column::Name)
            .column(user::Column::Email)
            .column(user::Column::Phone)
            .column(user::Column::BirthDate)
            .column_as(user::Column::Password, "password_hash")
            .column_as(role::Column::Id, "role_id")
            .column(role::Column::Authority)
            .join(JoinType::InnerJoin, user::Relation::UserRole.def())
            .join(JoinType::InnerJoin, user_role::Relation::Role.def())
            .order_by_asc(role::Column::Id)
    }

    async fn fetch(&self, query: Select<UserEntity>) -> AppResult<Vec<UserRoleRow>> {
        let records = query
            .into_model::<UserRoleRecord>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(records.into_iter().map(UserRoleRow::from).collect())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn search_user_and_roles_by_email(&self, email: &str) -> AppResult<Vec<UserRoleRow>> {
        let query = Self::projection().filter(user::Column::Email.eq(email));
        self.fetch(query).await
    }

    async fn search_user_and_roles_by_id(&self, id: i64) -> AppResult<Vec<UserRoleRow>> {
        let query = Self::projection().filter(user::Column::Id.eq(id));
        self.fetch(query).await
    }
}
