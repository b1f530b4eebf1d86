use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use eyre::Result;
use tracing::instrument;

use crate::model::{util::datetime_to_db_repr, CreateUser, User, UserId};

use super::db::DbConn;
use super::db_entity::DbUser;
use super::schema;

#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    #[error("a user with this email already exists")]
    EmailTaken,
    #[error(transparent)]
    Other(#[from] eyre::Report),
}

#[instrument(skip(conn), level = "trace")]
pub fn get_user_by_email(conn: &mut DbConn, with_email: &str) -> Result<Option<User>> {
    use schema::User;
    let db_user: Option<DbUser> = User::table
        .filter(User::email.eq(with_email))
        .select(DbUser::as_select())
        .first(conn)
        .optional()?;
    db_user.map(|u| u.try_into()).transpose()
}

#[instrument(skip(conn), level = "trace")]
pub fn insert_user(conn: &mut DbConn, create: &CreateUser) -> Result<UserId, InsertUserError> {
    use schema::User;
    let now = datetime_to_db_repr(&Utc::now());
    let id: i64 = diesel::insert_into(User::table)
        .values((
            User::email.eq(&create.email),
            User::password_hash.eq(&create.password_hash),
            User::created_at.eq(now),
        ))
        .returning(User::user_id)
        .get_result(conn)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                InsertUserError::EmailTaken
            }
            other => InsertUserError::Other(other.into()),
        })?;
    Ok(UserId(id))
}
