//! Store layer over PostgreSQL.
//!
//! Free async functions over an explicit `&PgPool` handle; no component
//! reaches for a global connection. All account-scoped task queries filter by
//! owner id inside the statement itself, and token-list mutations are
//! single-statement array operations.

pub mod accounts;
pub mod tasks;
