use sqlx::FromRow;
use std::fmt;

/// A row of the `users` table. `password` is stored exactly as given, unhashed.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.email, self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_space_separated_fields() {
        let user = User {
            id: 1,
            email: "i@blocklune.cc".to_string(),
            password: "password123".to_string(),
        };
        assert_eq!(user.to_string(), "1 i@blocklune.cc password123");
    }
}
