//! Builders for service tests.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use domain::{
    Category, Product, ProductInput, Role, User, UserRoleRow, ROLE_ADMIN, ROLE_CLIENT,
};

pub const EXISTING_ID: i64 = 1;
pub const NON_EXISTING_ID: i64 = 2;
pub const DEPENDENT_ID: i64 = 3;

pub fn price(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn client_role() -> Role {
    Role::new(1, ROLE_CLIENT)
}

pub fn admin_role() -> Role {
    Role::new(2, ROLE_ADMIN)
}

fn user(id: i64, name: &str, email: &str, roles: &[Role]) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: "988888888".to_string(),
        birth_date: None,
        password_hash: "$2a$10$eACCYoNOHEqXve8aIWT8Nu3PkMXWBaOxJ9aORUYzfMQCbVBIhZ8tG".to_string(),
        roles: roles.iter().cloned().collect::<BTreeSet<_>>(),
    }
}

pub fn client_user() -> User {
    user(1, "Maria Brown", "maria@gmail.com", &[client_role()])
}

pub fn admin_user() -> User {
    user(2, "Alex Green", "alex@gmail.com", &[client_role(), admin_role()])
}

pub fn other_client(id: i64) -> User {
    user(id, "Ana Yellow", "ana@gmail.com", &[client_role()])
}

/// One projection row per role of the user.
pub fn rows_for(user: &User) -> Vec<UserRoleRow> {
    user.roles
        .iter()
        .map(|role| UserRoleRow {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            birth_date: user.birth_date,
            password_hash: user.password_hash.clone(),
            role_id: role.id,
            authority: role.authority.clone(),
        })
        .collect()
}

pub fn category() -> Category {
    Category::new(2, "Eletrônicos")
}

pub fn product(id: i64) -> Product {
    Product {
        id,
        name: "Phone".to_string(),
        description: "Good Phone".to_string(),
        price: price("800.00"),
        img_url: "https://img.com/img.png".to_string(),
        categories: vec![category()],
    }
}

pub fn product_input() -> ProductInput {
    ProductInput {
        name: "Phone".to_string(),
        description: "Good Phone".to_string(),
        price: price("800.00"),
        img_url: "https://img.com/img.png".to_string(),
        category_ids: vec![category().id],
    }
}
