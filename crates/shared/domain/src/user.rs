//! User domain entity, roles and the row-per-role projection.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::ROLE_ADMIN;

/// Granted authority (e.g. `ROLE_CLIENT`, `ROLE_ADMIN`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub authority: String,
}

impl Role {
    pub fn new(id: i64, authority: impl Into<String>) -> Self {
        Self {
            id,
            authority: authority.into(),
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        self.authority == ROLE_ADMIN
    }
}

/// User aggregate with its granted roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Login identifier
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}

impl User {
    /// Check if user holds the admin authority
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    /// Self-or-admin rule: the user is the target or an administrator.
    pub fn is_self_or_admin(&self, target_user_id: i64) -> bool {
        self.id == target_user_id || self.is_admin()
    }

    pub fn add_role(&mut self, role: Role) {
        self.roles.insert(role);
    }
}

/// One flattened (user, role) record as returned by the directory lookup.
///
/// Never persisted; consumed by [`assemble_users`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleRow {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub password_hash: String,
    pub role_id: i64,
    pub authority: String,
}

impl UserRoleRow {
    fn role(&self) -> Role {
        Role::new(self.role_id, self.authority.clone())
    }

    fn into_user(self) -> User {
        let role = self.role();
        User {
            id: self.user_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            birth_date: self.birth_date,
            password_hash: self.password_hash,
            roles: BTreeSet::from([role]),
        }
    }
}

/// Fold projection rows into user aggregates.
///
/// Rows are grouped by login identifier. The first row seen for an
/// identifier supplies the user columns; every row contributes its role.
/// Users come back ordered by login identifier.
pub fn assemble_users(rows: impl IntoIterator<Item = UserRoleRow>) -> Vec<User> {
    let mut users: BTreeMap<String, User> = BTreeMap::new();

    for row in rows {
        match users.get_mut(&row.email) {
            Some(user) => user.add_role(row.role()),
            None => {
                users.insert(row.email.clone(), row.into_user());
            }
        }
    }

    users.into_values().collect()
}
