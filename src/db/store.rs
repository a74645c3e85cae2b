use crate::config::DbConfig;
use crate::db::models::User;
use crate::db::schema::{Backend, UserQueries};
use crate::error::StoreError;
use futures::TryStreamExt;
use sqlx::any::install_default_drivers;
use sqlx::{AnyConnection, Connection, Executor, Row, Statement};
use tracing::{debug, info};

/// CRUD access to the `users` table over a single open connection.
///
/// Every operation is one statement under the backend's auto-commit. Methods
/// take `&mut self`, so one caller drives the store at a time.
pub struct UserStore {
    conn: AnyConnection,
    backend: Backend,
}

impl UserStore {
    /// Open a connection described by `cfg` and check it with a ping.
    pub async fn from_config(cfg: &DbConfig) -> Result<Self, StoreError> {
        let url = cfg.connection_url()?;
        Self::connect(&url).await
    }

    /// Open a connection from a full URL (`mysql://`, `postgres://` or `sqlite:`).
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let backend = Backend::from_url(url)?;
        install_default_drivers();

        let mut conn = AnyConnection::connect(url)
            .await
            .map_err(StoreError::Connection)?;
        conn.ping().await.map_err(StoreError::Connection)?;

        info!(backend = %backend, "connected to database");
        Ok(Self { conn, backend })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Round trip to confirm the connection is still usable.
    pub async fn ping(&mut self) -> Result<(), StoreError> {
        self.conn.ping().await.map_err(StoreError::Connection)
    }

    /// Close the connection. Dropping the store releases it as well.
    pub async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await.map_err(StoreError::Connection)?;
        info!(backend = %self.backend, "database connection closed");
        Ok(())
    }

    fn queries(&self) -> &'static UserQueries {
        self.backend.queries()
    }

    /// Create the `users` table. Fails if it already exists.
    pub async fn create_users_table(&mut self) -> Result<(), StoreError> {
        sqlx::query(self.queries().create_table)
            .execute(&mut self.conn)
            .await?;
        debug!("created users table");
        Ok(())
    }

    pub async fn add_user(&mut self, email: &str, password: &str) -> Result<(), StoreError> {
        sqlx::query(self.queries().insert)
            .bind(email)
            .bind(password)
            .execute(&mut self.conn)
            .await?;
        debug!(email, "inserted user");
        Ok(())
    }

    /// Insert through a prepared statement and return the generated id.
    pub async fn add_user_returning_id(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<i64, StoreError> {
        let queries = self.queries();

        let id = match queries.insert_returning_id {
            Some(sql) => {
                let stmt = self.conn.prepare(sql).await?;
                let row = stmt
                    .query()
                    .bind(email)
                    .bind(password)
                    .fetch_one(&mut self.conn)
                    .await?;
                row.try_get::<i64, _>(0)?
            }
            None => {
                let stmt = self.conn.prepare(queries.insert).await?;
                let result = stmt
                    .query()
                    .bind(email)
                    .bind(password)
                    .execute(&mut self.conn)
                    .await?;
                result.last_insert_id().ok_or(StoreError::MissingInsertId)?
            }
        };

        debug!(email, id, "inserted user with prepared statement");
        Ok(id)
    }

    /// All rows, in whatever order the backend returns them.
    pub async fn list_users(&mut self) -> Result<Vec<User>, StoreError> {
        let mut rows = sqlx::query_as::<_, User>(self.queries().select_all).fetch(&mut self.conn);

        let mut users = Vec::new();
        while let Some(user) = rows.try_next().await? {
            users.push(user);
        }
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// First row matching `email`, or `StoreError::NotFound`.
    pub async fn find_user_by_email(&mut self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(self.queries().select_by_email)
            .bind(email)
            .fetch_optional(&mut self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                email: email.to_string(),
            })
    }

    /// Returns the number of rows changed; zero is not an error.
    pub async fn update_user_password(
        &mut self,
        email: &str,
        new_password: &str,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(self.queries().update_password)
            .bind(new_password)
            .bind(email)
            .execute(&mut self.conn)
            .await?;
        let rows_affected = result.rows_affected();
        debug!(email, rows_affected, "updated user password");
        Ok(rows_affected)
    }

    /// Returns the number of rows removed; zero is not an error.
    pub async fn delete_user_by_email(&mut self, email: &str) -> Result<u64, StoreError> {
        let result = sqlx::query(self.queries().delete_by_email)
            .bind(email)
            .execute(&mut self.conn)
            .await?;
        let rows_affected = result.rows_affected();
        debug!(email, rows_affected, "deleted user");
        Ok(rows_affected)
    }
}
