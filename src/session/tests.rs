use super::*;
use crate::error::StorageError;
use crate::storage::MemoryStore;

fn ada() -> UserProfile {
    UserProfile::new("u-1", "ada@example.com").with_display_name("Ada")
}

fn bob() -> UserProfile {
    UserProfile::new("u-2", "bob@example.com").with_display_name("Bob")
}

/// Accepts token writes but rejects the user record.
#[derive(Clone)]
struct UserWritesFail(MemoryStore);

impl KeyValueStore for UserWritesFail {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == STORAGE_USER_KEY {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.0.set(key, value)
    }

    fn remove(&self, key: &str) {
        self.0.remove(key)
    }
}

fn persisted(store: &MemoryStore, token: &str, user: &UserProfile) {
    store.set(STORAGE_TOKEN_KEY, token).unwrap();
    store
        .set(STORAGE_USER_KEY, &serde_json::to_string(user).unwrap())
        .unwrap();
}

#[test]
fn starts_loading_and_unauthenticated() {
    let holder = SessionHolder::new(MemoryStore::new());
    assert!(holder.is_loading());
    assert!(!holder.is_authenticated());
}

#[test]
fn initialize_restores_a_valid_session() {
    let store = MemoryStore::new();
    persisted(&store, "tok-1", &ada());

    let mut holder = SessionHolder::new(store);
    holder.initialize().unwrap();

    assert!(!holder.is_loading());
    assert_eq!(holder.user(), Some(&ada()));
    assert_eq!(holder.token(), Some("tok-1"));
}

#[test]
fn initialize_without_storage_ends_unauthenticated() {
    let mut holder = SessionHolder::new(MemoryStore::new());
    holder.initialize().unwrap();
    assert!(!holder.is_loading());
    assert!(holder.user().is_none());
}

#[test]
fn corrupted_user_record_is_wiped_and_reported() {
    let store = MemoryStore::new();
    store.set(STORAGE_TOKEN_KEY, "tok-1").unwrap();
    store.set(STORAGE_USER_KEY, "{not json").unwrap();

    let mut holder = SessionHolder::new(store.clone());
    let err = holder.initialize().unwrap_err();

    assert!(matches!(err, SessionError::Corrupted(_)));
    assert!(!holder.is_loading());
    assert!(!holder.is_authenticated());
    assert!(store.is_empty());
}

#[test]
fn user_record_missing_required_fields_is_corrupted() {
    let store = MemoryStore::new();
    store.set(STORAGE_TOKEN_KEY, "tok-1").unwrap();
    store.set(STORAGE_USER_KEY, r#"{"displayName":"Ada"}"#).unwrap();

    let mut holder = SessionHolder::new(store);
    assert!(matches!(holder.initialize(), Err(SessionError::Corrupted(_))));
}

#[test]
fn lone_token_is_discarded() {
    let store = MemoryStore::new();
    store.set(STORAGE_TOKEN_KEY, "tok-1").unwrap();

    let mut holder = SessionHolder::new(store.clone());
    holder.initialize().unwrap();

    assert!(!holder.is_authenticated());
    assert!(store.is_empty());
}

#[test]
fn initialize_runs_once() {
    let store = MemoryStore::new();
    let mut holder = SessionHolder::new(store.clone());
    holder.initialize().unwrap();

    // written behind the holder's back after start-up
    persisted(&store, "tok-late", &ada());
    holder.initialize().unwrap();

    assert!(!holder.is_authenticated());
}

#[test]
fn login_writes_storage_and_state_identically() {
    let store = MemoryStore::new();
    let mut holder = SessionHolder::new(store.clone());
    holder.initialize().unwrap();

    holder.login(ada(), "tok-2").unwrap();

    assert_eq!(holder.token(), Some("tok-2"));
    assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok-2"));
    let cached: UserProfile = serde_json::from_str(&store.get(STORAGE_USER_KEY).unwrap()).unwrap();
    assert_eq!(holder.user(), Some(&cached));
}

#[test]
fn failed_login_write_leaves_memory_and_storage_empty() {
    let store = MemoryStore::new();
    let mut holder = SessionHolder::new(store.clone());
    holder.initialize().unwrap();
    store.set_read_only(true);

    assert!(matches!(holder.login(ada(), "tok"), Err(SessionError::Storage(_))));
    assert!(!holder.is_authenticated());
    assert!(store.is_empty());
}

#[test]
fn failed_relogin_keeps_the_previous_session_everywhere() {
    let store = MemoryStore::new();
    persisted(&store, "tok-1", &ada());
    let mut holder = SessionHolder::new(UserWritesFail(store.clone()));
    holder.initialize().unwrap();

    assert!(matches!(holder.login(bob(), "tok-2"), Err(SessionError::Storage(_))));

    assert_eq!(holder.token(), Some("tok-1"));
    assert_eq!(holder.user(), Some(&ada()));
    assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), holder.token());
    let cached: UserProfile = serde_json::from_str(&store.get(STORAGE_USER_KEY).unwrap()).unwrap();
    assert_eq!(holder.user(), Some(&cached));
}

#[test]
fn failed_first_login_leaves_no_token_behind() {
    let store = MemoryStore::new();
    let mut holder = SessionHolder::new(UserWritesFail(store.clone()));
    holder.initialize().unwrap();

    assert!(holder.login(ada(), "tok-1").is_err());
    assert!(!holder.is_authenticated());
    assert!(store.is_empty());
}

#[test]
fn logout_clears_storage_and_state() {
    let store = MemoryStore::new();
    let mut holder = SessionHolder::new(store.clone());
    holder.login(ada(), "tok-3").unwrap();

    holder.logout();

    assert!(holder.user().is_none());
    assert!(holder.token().is_none());
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());
    assert!(store.get(STORAGE_USER_KEY).is_none());
}

#[test]
fn update_user_keeps_token() {
    let store = MemoryStore::new();
    let mut holder = SessionHolder::new(store.clone());
    holder.login(ada(), "tok-4").unwrap();

    let renamed = UserProfile {
        display_name: Some("Ada L.".into()),
        ..ada()
    };
    holder.update_user(renamed.clone()).unwrap();

    assert_eq!(holder.user(), Some(&renamed));
    assert_eq!(holder.token(), Some("tok-4"));
    assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok-4"));
    assert!(store.get(STORAGE_USER_KEY).unwrap().contains("Ada L."));
}

#[test]
fn update_user_requires_a_session() {
    let mut holder = SessionHolder::new(MemoryStore::new());
    assert_eq!(holder.update_user(ada()), Err(SessionError::NotAuthenticated));
}
