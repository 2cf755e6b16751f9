//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{Role, User};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    country: String,
    role: String,
    created_at: i64,
}

impl UserRow {
    fn into_user(self) -> RepoResult<(User, String)> {
        let role = self.role.parse::<Role>().map_err(RepoError::Database)?;
        let user = User {
            id: self.id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            country: self.country,
            role,
            created_at: self.created_at,
        };
        Ok((user, self.password_hash))
    }
}

/// New account; `password_hash` is already hashed
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: &'a str,
    pub country: &'a str,
    pub role: Role,
}

/// Find a user and its password hash by (lowercased) email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<(User, String)>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, name, email, password_hash, phone, country, role, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    row.map(UserRow::into_user).transpose()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, name, email, password_hash, phone, country, role, created_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(UserRow::into_user).transpose()?.map(|(user, _)| user))
}

pub async fn create(pool: &SqlitePool, new: &NewUser<'_>) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, email, password_hash, phone, country, role, created_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(new.name)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.phone)
    .bind(new.country)
    .bind(new.role.as_str())
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => RepoError::Duplicate(format!("Email {} is already registered", new.email)),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Create the admin account if the email is unused, or promote it to admin.
/// Returns true when a new account was inserted.
pub async fn ensure_admin(pool: &SqlitePool, email: &str, password_hash: &str) -> RepoResult<bool> {
    if find_by_email(pool, email).await?.is_some() {
        sqlx::query("UPDATE users SET role = 'admin' WHERE email = ?")
            .bind(email)
            .execute(pool)
            .await?;
        return Ok(false);
    }
    create(
        pool,
        &NewUser {
            name: "Administrator",
            email,
            password_hash,
            phone: "",
            country: "",
            role: Role::Admin,
        },
    )
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn customer<'a>(email: &'a str) -> NewUser<'a> {
        NewUser {
            name: "Nimal Perera",
            email,
            password_hash: "hash",
            phone: "+94 77 123 4567",
            country: "Sri Lanka",
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let user = create(&db.pool, &customer("nimal@example.lk")).await.unwrap();
        assert_eq!(user.role, Role::Customer);

        let err = create(&db.pool, &customer("nimal@example.lk")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg.contains("nimal@example.lk")));
    }

    #[tokio::test]
    async fn test_find_by_email_returns_hash() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, &customer("a@example.lk")).await.unwrap();
        let (user, hash) = find_by_email(&db.pool, "a@example.lk").await.unwrap().unwrap();
        assert_eq!(user.name, "Nimal Perera");
        assert_eq!(hash, "hash");
        assert!(find_by_email(&db.pool, "b@example.lk").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ensure_admin_creates_then_promotes() {
        let db = DbService::in_memory().await.unwrap();
        assert!(ensure_admin(&db.pool, "root@ceylon.travel", "h").await.unwrap());
        assert!(!ensure_admin(&db.pool, "root@ceylon.travel", "h").await.unwrap());

        create(&db.pool, &customer("promote@example.lk")).await.unwrap();
        ensure_admin(&db.pool, "promote@example.lk", "h").await.unwrap();
        let (user, _) = find_by_email(&db.pool, "promote@example.lk").await.unwrap().unwrap();
        assert!(user.role.is_admin());
    }
}
