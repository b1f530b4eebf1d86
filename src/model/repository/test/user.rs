use claims::{assert_matches, assert_none, assert_ok, assert_some};
use pretty_assertions::assert_eq;

use crate::model::{repository, repository::user::InsertUserError, CreateUser};

#[test]
fn insert_and_retrieve_user() {
    let mut conn = super::super::db::open_in_memory_and_migrate();
    let create = CreateUser {
        email: "alice@example.com".to_owned(),
        password_hash: "$argon2id$fake".to_owned(),
    };
    let id = assert_ok!(repository::user::insert_user(&mut conn, &create));
    let user = assert_some!(assert_ok!(repository::user::get_user_by_email(
        &mut conn,
        "alice@example.com"
    )));
    assert_eq!(user.id, id);
    assert_eq!(user.email, create.email);
    assert_eq!(user.password_hash, create.password_hash);
}

#[test]
fn duplicate_email_is_rejected() {
    let mut conn = super::super::db::open_in_memory_and_migrate();
    let create = CreateUser {
        email: "alice@example.com".to_owned(),
        password_hash: "$argon2id$fake".to_owned(),
    };
    assert_ok!(repository::user::insert_user(&mut conn, &create));
    let err = repository::user::insert_user(&mut conn, &create).unwrap_err();
    assert_matches!(err, InsertUserError::EmailTaken);
}

#[test]
fn unknown_email_is_none() {
    let mut conn = super::super::db::open_in_memory_and_migrate();
    assert_none!(assert_ok!(repository::user::get_user_by_email(
        &mut conn,
        "nobody@example.com"
    )));
}
