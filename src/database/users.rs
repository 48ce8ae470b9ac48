use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, IntoActiveModel,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use super::{connector::DB, models::user};
use crate::errors::AppError;

/// Validated input for a new user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validated partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Storage client for the `users` table. Every mutation runs inside its own
/// transaction; returning early drops the transaction and rolls it back.
#[derive(Clone)]
pub struct UserStore {
    db: DB,
}

impl UserStore {
    pub fn new(db: DB) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, AppError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn find(&self, id: i32) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create(&self, new_user: NewUser) -> Result<user::Model, AppError> {
        let txn = self.db.begin().await?;

        if email_taken(&txn, &new_user.email, None).await? {
            log::warn!("Rejected create: email {} already in use", new_user.email);
            return Err(AppError::EmailInUse);
        }

        let created = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password: Set(new_user.password),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_unique_violation)?;

        txn.commit().await?;
        Ok(created)
    }

    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<user::Model, AppError> {
        let txn = self.db.begin().await?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        if let Some(email) = changes.email.as_deref() {
            if email != existing.email && email_taken(&txn, email, Some(id)).await? {
                log::warn!("Rejected update of user {}: email {} already in use", id, email);
                return Err(AppError::EmailInUse);
            }
        }

        let mut active = existing.clone().into_active_model();
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password) = changes.password {
            active.password = Set(password);
        }

        if !active.is_changed() {
            txn.commit().await?;
            return Ok(existing);
        }

        let updated = active.update(&txn).await.map_err(map_unique_violation)?;
        txn.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let txn = self.db.begin().await?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(AppError::user_not_found)?;

        existing.delete(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(user::Entity::find().count(&self.db).await?)
    }
}

/// True when another row (other than `except_id`) already owns `email`.
async fn email_taken<C>(conn: &C, email: &str, except_id: Option<i32>) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(conn).await?.is_some())
}

// `email` is the only unique column, so any unique violation is an email clash
// that slipped past the pre-check under concurrent writes.
fn map_unique_violation(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::EmailInUse,
        _ => AppError::DbError(err),
    }
}
