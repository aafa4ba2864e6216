#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "This crate contains the core business logic for the TaskVault backend: account"]
#![doc = "and task models, the authentication substrate (password hashing, session"]
#![doc = "tokens, the authorization guard), the store layer over PostgreSQL, routing"]
#![doc = "configuration, and error handling. It is used by the main binary (`main.rs`)"]
#![doc = "to construct and run the application."]

pub mod auth;
pub mod avatar;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
