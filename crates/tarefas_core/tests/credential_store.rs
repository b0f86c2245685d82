mod common;

use common::FlakyStore;
use tarefas_core::db::open_db_in_memory;
use tarefas_core::{
    password_checksum, CredentialStore, ErrorKind, KeyValueStore, SqliteKeyValueStore,
    StoreError, ValidationError,
};

fn setup() -> rusqlite::Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn register_then_login_returns_same_user() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();

    let user = store.register("alice", "secret1").unwrap();
    let session = store.login("alice", "secret1").unwrap();

    assert_eq!(session.username(), "alice");
    assert_eq!(session.user(), &user);
    assert!(store.is_authenticated());
}

#[test]
fn login_with_wrong_password_is_auth_error() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();
    store.register("alice", "secret1").unwrap();

    let err = store.login("alice", "secret2").unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert!(!store.is_authenticated());
}

#[test]
fn login_with_unknown_user_is_auth_error() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();

    let err = store.login("nobody", "secret1").unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));
}

#[test]
fn login_validates_format_before_lookup() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();

    let err = store.login("al", "secret1").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::UsernameTooShort)
    ));
}

#[test]
fn register_rejects_malformed_credentials() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();

    let cases = [
        ("ab", "secret1", ValidationError::UsernameTooShort),
        ("alice", "abc", ValidationError::PasswordTooShort),
        ("alice-b", "secret1", ValidationError::UsernameInvalidChars),
    ];
    for (username, password, expected) in cases {
        let err = store.register(username, password).unwrap_err();
        assert!(
            matches!(err, StoreError::Validation(actual) if actual == expected),
            "{username}/{password}: {err}"
        );
    }
    assert_eq!(store.users_count(), 0);
}

#[test]
fn duplicate_registration_keeps_collection_size() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();
    store.register("alice", "secret1").unwrap();

    let err = store.register("alice", "another").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateUsername(ref name) if name == "alice"));
    assert_eq!(store.users_count(), 1);

    let reloaded = CredentialStore::open(kv).unwrap();
    assert_eq!(reloaded.users_count(), 1);
}

#[test]
fn credentials_are_trimmed() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();

    let user = store.register("  alice ", " secret1 ").unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.password, password_checksum("secret1"));
    store.login("alice", "secret1").unwrap();
}

#[test]
fn password_is_persisted_as_checksum() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();
    store.register("alice", "password").unwrap();

    let raw = kv.get("users").unwrap().unwrap();
    assert!(raw.contains("\"password\":\"1216985755\""));
    assert!(!raw.contains("\"password\":\"password\""));
}

#[test]
fn session_is_persisted_and_resumed() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();
    store.register("alice", "secret1").unwrap();
    store.login("alice", "secret1").unwrap();

    assert_eq!(kv.get("currentUser").unwrap().as_deref(), Some("alice"));

    let mut restarted = CredentialStore::open(kv).unwrap();
    assert!(!restarted.is_authenticated());
    let session = restarted.resume_session().unwrap().unwrap();
    assert_eq!(session.username(), "alice");
    assert_eq!(restarted.current_session(), Some(&session));
}

#[test]
fn resume_ignores_unknown_session_user() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    kv.set("currentUser", "ghost").unwrap();

    let mut store = CredentialStore::open(kv).unwrap();
    assert_eq!(store.resume_session().unwrap(), None);
    assert!(!store.is_authenticated());
}

#[test]
fn resume_without_saved_session_is_none() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();

    assert_eq!(store.resume_session().unwrap(), None);
}

#[test]
fn logout_clears_memory_and_storage() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();
    store.register("alice", "secret1").unwrap();
    store.login("alice", "secret1").unwrap();

    store.logout().unwrap();

    assert!(!store.is_authenticated());
    assert_eq!(kv.get("currentUser").unwrap(), None);
    assert_eq!(store.resume_session().unwrap(), None);
}

#[test]
fn users_are_listed_in_registration_order() {
    let conn = setup();
    let kv = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut store = CredentialStore::open(kv).unwrap();
    store.register("carol", "secret1").unwrap();
    store.register("alice", "secret1").unwrap();

    let names: Vec<&str> = store.users().iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["carol", "alice"]);
}

#[test]
fn failed_register_write_keeps_users_unchanged() {
    let conn = setup();
    let flaky = FlakyStore::new(&conn);
    let mut store = CredentialStore::open(&flaky).unwrap();
    store.register("alice", "secret1").unwrap();

    flaky.fail_writes(true);
    let err = store.register("bob_2", "secret2").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert_eq!(store.users_count(), 1);
    assert_eq!(store.users()[0].username, "alice");

    flaky.fail_writes(false);
    let reloaded = CredentialStore::open(&flaky).unwrap();
    assert_eq!(reloaded.users(), store.users());
}

#[test]
fn failed_login_write_leaves_no_session() {
    let conn = setup();
    let flaky = FlakyStore::new(&conn);
    let mut store = CredentialStore::open(&flaky).unwrap();
    store.register("alice", "secret1").unwrap();

    flaky.fail_writes(true);
    let err = store.login("alice", "secret1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(!store.is_authenticated());
    assert!(store.current_session().is_none());

    flaky.fail_writes(false);
    assert_eq!(flaky.get("currentUser").unwrap(), None);
    assert!(store.resume_session().unwrap().is_none());
}
