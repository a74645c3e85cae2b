//! Database module: the `users` table and the store that reads and writes it.
//!
//! Layout:
//! - `models.rs`: the `User` row type
//! - `schema.rs`: backend detection and per-backend SQL
//! - `store.rs`: `UserStore`, the CRUD operations over one connection

pub mod models;
pub mod schema;
pub mod store;

pub use models::User;
pub use schema::Backend;
pub use store::UserStore;
