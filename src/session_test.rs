use super::*;
use crate::navigation::History;
use crate::storage::MemoryStore;
use crate::types::Role;

fn user(role: Role) -> UserSummary {
    UserSummary { id: 1, username: "alice".into(), display_name: "Alice".into(), role }
}

fn context_with(storage: Arc<MemoryStore>) -> (SessionContext, Arc<History>) {
    let history = Arc::new(History::default());
    let ctx = SessionContext::new(storage, history.clone());
    (ctx, history)
}

// =============================================================================
// Derived flags
// =============================================================================

#[test]
fn absent_token_is_unauthenticated() {
    let session = Session { user: Some(user(Role::Admin)), token: None };
    assert!(!session.is_authenticated());
}

#[test]
fn empty_token_is_unauthenticated() {
    let session = Session { user: None, token: Some(String::new()) };
    assert!(!session.is_authenticated());
}

#[test]
fn present_token_is_authenticated_even_without_user() {
    let session = Session { user: None, token: Some("tok".into()) };
    assert!(session.is_authenticated());
    assert!(!session.is_admin());
}

#[test]
fn admin_flag_follows_user_role() {
    for (role, expected) in [
        (Role::Admin, true),
        (Role::Reader, false),
        (Role::Other("USER".into()), false),
        (Role::Other("LIBRARIAN".into()), false),
    ] {
        let session = Session { user: Some(user(role.clone())), token: Some("t".into()) };
        assert_eq!(session.is_admin(), expected, "role {role}");
    }
}

#[test]
fn absent_user_is_not_admin() {
    assert!(!Session::default().is_admin());
}

// =============================================================================
// Seeding from storage
// =============================================================================

#[test]
fn seeds_from_persisted_entries() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(USER_KEY, &serde_json::to_string(&user(Role::Admin)).unwrap()).unwrap();
    storage.set(TOKEN_KEY, "tok123").unwrap();

    let (ctx, _) = context_with(storage);
    assert_eq!(ctx.token().as_deref(), Some("tok123"));
    assert_eq!(ctx.user(), Some(user(Role::Admin)));
    assert!(ctx.is_authenticated());
    assert!(ctx.is_admin());
}

#[test]
fn malformed_user_seeds_absent_user_but_keeps_token() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(USER_KEY, "{ definitely not json").unwrap();
    storage.set(TOKEN_KEY, "tok").unwrap();

    let (ctx, _) = context_with(storage);
    assert_eq!(ctx.user(), None);
    assert!(ctx.is_authenticated());
    assert!(!ctx.is_admin());
}

#[test]
fn user_without_token_is_unauthenticated() {
    let storage = Arc::new(MemoryStore::new());
    storage.set(USER_KEY, &serde_json::to_string(&user(Role::Admin)).unwrap()).unwrap();

    let (ctx, _) = context_with(storage);
    assert!(ctx.user().is_some());
    assert!(!ctx.is_authenticated());
    // Role still reads as admin; the guard checks authentication first.
    assert!(ctx.is_admin());
}

#[test]
fn empty_storage_seeds_empty_session() {
    let (ctx, _) = context_with(Arc::new(MemoryStore::new()));
    assert_eq!(ctx.snapshot(), Session::default());
}

// =============================================================================
// install / logout
// =============================================================================

#[test]
fn install_sets_memory_and_storage() {
    let storage = Arc::new(MemoryStore::new());
    let (ctx, _) = context_with(storage.clone());

    ctx.install(user(Role::Reader), "tok456".into());

    assert_eq!(ctx.token().as_deref(), Some("tok456"));
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok456"));
    let stored: UserSummary = serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored, user(Role::Reader));
}

#[test]
fn logout_clears_memory_storage_and_navigates_to_login() {
    let storage = Arc::new(MemoryStore::new());
    let (ctx, history) = context_with(storage.clone());
    ctx.install(user(Role::Admin), "tok".into());

    ctx.logout();

    assert_eq!(ctx.snapshot(), Session::default());
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(history.current(), LOGIN_PATH);
}

#[test]
fn logout_when_logged_out_still_navigates() {
    let storage = Arc::new(MemoryStore::new());
    let (ctx, history) = context_with(storage.clone());

    ctx.logout();
    ctx.logout();

    assert!(storage.is_empty());
    assert_eq!(history.visits(LOGIN_PATH), 2);
}

#[test]
fn set_auth_token_does_not_touch_storage() {
    let storage = Arc::new(MemoryStore::new());
    let (ctx, _) = context_with(storage.clone());

    ctx.set_auth_token(Some("memory-only".into()));
    assert!(ctx.is_authenticated());
    assert!(storage.is_empty());
}

// =============================================================================
// token_preview
// =============================================================================

#[test]
fn token_preview_truncates_long_tokens() {
    assert_eq!(token_preview("abcdefghijklmnop"), "abcdefgh");
    assert_eq!(token_preview("short"), "short");
    assert_eq!(token_preview(""), "");
}

#[test]
fn debug_output_hides_full_token() {
    let (ctx, _) = context_with(Arc::new(MemoryStore::new()));
    ctx.set_auth_token(Some("supersecrettoken".into()));
    let rendered = format!("{ctx:?}");
    assert!(rendered.contains("supersec"));
    assert!(!rendered.contains("supersecrettoken"));
}

// =============================================================================
// Concurrent readers
// =============================================================================

#[test]
fn readers_never_observe_half_updated_session() {
    let (ctx, _history) = context_with(Arc::new(MemoryStore::new()));
    let ctx = Arc::new(ctx);
    let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let reader = {
        let ctx = ctx.clone();
        let done = done.clone();
        std::thread::spawn(move || {
            let mut torn = 0;
            while !done.load(std::sync::atomic::Ordering::Relaxed) {
                let session = ctx.snapshot();
                if session.user.is_some() != session.token.is_some() {
                    torn += 1;
                }
            }
            torn
        })
    };

    for i in 0..2_000 {
        ctx.install(user(Role::Reader), format!("tok-{i}"));
        ctx.logout();
    }
    done.store(true, std::sync::atomic::Ordering::Relaxed);

    assert_eq!(reader.join().unwrap(), 0);
}

// =============================================================================
// Storage failures stay inside the session
// =============================================================================

struct BrokenStore;

impl crate::storage::KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, crate::error::StorageError> {
        Err(broken())
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), crate::error::StorageError> {
        Err(broken())
    }

    fn remove(&self, _key: &str) -> Result<(), crate::error::StorageError> {
        Err(broken())
    }
}

fn broken() -> crate::error::StorageError {
    crate::error::StorageError::Io {
        path: "/unwritable/session.json".into(),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    }
}

#[test]
fn unwritable_storage_still_updates_memory() {
    let history = Arc::new(History::default());
    let ctx = SessionContext::new(Arc::new(BrokenStore), history.clone());
    assert_eq!(ctx.snapshot(), Session::default());

    ctx.install(user(Role::Admin), "tok".into());
    assert!(ctx.is_admin());

    ctx.logout();
    assert_eq!(ctx.snapshot(), Session::default());
    assert_eq!(history.current(), LOGIN_PATH);
}
