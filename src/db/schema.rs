//! SQL for the `users` table, one statement set per backend.
//! MySQL and SQLite bind with `?`, PostgreSQL with `$n`.

use crate::error::StoreError;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    #[serde(alias = "mariadb")]
    Mysql,
    #[serde(alias = "postgresql")]
    Postgres,
    Sqlite,
}

impl Backend {
    /// Detect the backend from a connection URL's scheme.
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let scheme = url.split_once(':').map(|(s, _)| s).unwrap_or(url);
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Backend::Mysql),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            _ => Err(StoreError::UnsupportedDriver(scheme.to_string())),
        }
    }

    pub fn scheme(self) -> &'static str {
        match self {
            Backend::Mysql => "mysql",
            Backend::Postgres => "postgres",
            Backend::Sqlite => "sqlite",
        }
    }

    pub fn queries(self) -> &'static UserQueries {
        match self {
            Backend::Mysql => &MYSQL,
            Backend::Postgres => &POSTGRES,
            Backend::Sqlite => &SQLITE,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

pub struct UserQueries {
    /// No `IF NOT EXISTS`: a second create fails.
    pub create_table: &'static str,
    pub insert: &'static str,
    /// Used instead of the driver's last-insert-id when set.
    /// The `Any` driver reports no last-insert-id for PostgreSQL or SQLite.
    pub insert_returning_id: Option<&'static str>,
    pub select_all: &'static str,
    pub select_by_email: &'static str,
    pub update_password: &'static str,
    pub delete_by_email: &'static str,
}

pub const MYSQL: UserQueries = UserQueries {
    create_table: r#"
CREATE TABLE users (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    email VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL
)
"#,
    insert: "INSERT INTO users (email, password) VALUES (?, ?)",
    insert_returning_id: None,
    select_all: "SELECT id, email, password FROM users",
    select_by_email: "SELECT id, email, password FROM users WHERE email = ?",
    update_password: "UPDATE users SET password = ? WHERE email = ?",
    delete_by_email: "DELETE FROM users WHERE email = ?",
};

pub const POSTGRES: UserQueries = UserQueries {
    create_table: r#"
CREATE TABLE users (
    id BIGSERIAL PRIMARY KEY,
    email VARCHAR(255) NOT NULL,
    password VARCHAR(255) NOT NULL
)
"#,
    insert: "INSERT INTO users (email, password) VALUES ($1, $2)",
    insert_returning_id: Some("INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id"),
    select_all: "SELECT id, email, password FROM users",
    select_by_email: "SELECT id, email, password FROM users WHERE email = $1",
    update_password: "UPDATE users SET password = $1 WHERE email = $2",
    delete_by_email: "DELETE FROM users WHERE email = $1",
};

/// `INTEGER PRIMARY KEY` makes `id` the rowid alias.
pub const SQLITE: UserQueries = UserQueries {
    create_table: r#"
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    password TEXT NOT NULL
)
"#,
    insert: "INSERT INTO users (email, password) VALUES (?, ?)",
    insert_returning_id: Some("INSERT INTO users (email, password) VALUES (?, ?) RETURNING id"),
    select_all: "SELECT id, email, password FROM users",
    select_by_email: "SELECT id, email, password FROM users WHERE email = ?",
    update_password: "UPDATE users SET password = ? WHERE email = ?",
    delete_by_email: "DELETE FROM users WHERE email = ?",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_backend_from_scheme() {
        assert_eq!(Backend::from_url("mysql://u:p@h:3306/db").unwrap(), Backend::Mysql);
        assert_eq!(Backend::from_url("MariaDB://h/db").unwrap(), Backend::Mysql);
        assert_eq!(
            Backend::from_url("postgresql://h/db").unwrap(),
            Backend::Postgres
        );
        assert_eq!(Backend::from_url("sqlite::memory:").unwrap(), Backend::Sqlite);
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = Backend::from_url("oracle://h/db").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedDriver(s) if s == "oracle"));
    }

    #[test]
    fn only_mysql_relies_on_last_insert_id() {
        assert!(Backend::Mysql.queries().insert_returning_id.is_none());
        assert!(Backend::Sqlite.queries().insert_returning_id.is_some());
        assert!(Backend::Postgres.queries().insert_returning_id.is_some());
    }
}
