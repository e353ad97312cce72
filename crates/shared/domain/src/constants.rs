//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Authority held by every registered customer
pub const ROLE_CLIENT: &str = "ROLE_CLIENT";

/// Administrator authority with elevated privileges
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// All known authorities, seeded into the role table
pub const VALID_ROLES: &[&str] = &[ROLE_CLIENT, ROLE_ADMIN];

// =============================================================================
// Catalog validation
// =============================================================================

/// Minimum product name length
pub const MIN_PRODUCT_NAME_LENGTH: usize = 3;

/// Maximum product name length
pub const MAX_PRODUCT_NAME_LENGTH: usize = 80;

/// Minimum product description length
pub const MIN_PRODUCT_DESCRIPTION_LENGTH: usize = 10;

// =============================================================================
// Pagination
// =============================================================================

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 12;

/// Upper bound on the requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

// =============================================================================
// Authentication
// =============================================================================

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";
