use super::*;

#[test]
fn context_ignores_blank_tokens() {
    let ctx = SessionContext::new(Some("   ".to_string()), Some(ViewerRole::Admin));
    assert_eq!(ctx.token(), None);
    assert_eq!(ctx.role(), Some(&ViewerRole::Admin));

    let ctx = SessionContext::anonymous().with_token("abc");
    assert_eq!(ctx.token(), Some("abc"));
}

#[test]
fn context_loads_role_and_token_from_store() {
    let store = MemorySessionStore::new();
    store.set(TOKEN_KEY, "tok-1").expect("set token");
    store.set(ROLE_KEY, "loggedPatient").expect("set role");

    let ctx = SessionContext::load(&store).expect("load");
    assert_eq!(ctx.token(), Some("tok-1"));
    assert_eq!(ctx.role(), Some(&ViewerRole::AuthenticatedPatient));
}

#[test]
fn missing_keys_yield_anonymous_context() {
    let store = MemorySessionStore::new();
    assert_eq!(
        SessionContext::load(&store).expect("load"),
        SessionContext::anonymous()
    );
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");

    let ctx = SessionContext::anonymous()
        .with_token("admin-token")
        .with_role(ViewerRole::Admin);
    ctx.save(&FileSessionStore::new(&path)).expect("save");

    let reloaded = SessionContext::load(&FileSessionStore::new(&path)).expect("load");
    assert_eq!(reloaded, ctx);

    let store = FileSessionStore::new(&path);
    store.remove(TOKEN_KEY).expect("remove");
    assert_eq!(store.get(TOKEN_KEY).expect("get"), None);
    assert_eq!(store.get(ROLE_KEY).expect("get").as_deref(), Some("admin"));
}

#[test]
fn file_store_reports_corrupt_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").expect("write");

    let err = FileSessionStore::new(&path).get(TOKEN_KEY).expect_err("corrupt");
    assert!(matches!(err, SessionError::Corrupt { .. }));
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("absent.json"));
    assert_eq!(store.get(ROLE_KEY).expect("get"), None);
}
