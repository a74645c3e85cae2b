pub mod config;
pub mod db;
pub mod error;

pub use config::{Config, DbConfig};
pub use db::{Backend, User, UserStore};
pub use error::StoreError;
