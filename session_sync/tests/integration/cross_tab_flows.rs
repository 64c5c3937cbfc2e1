use std::sync::Arc;
use std::time::Duration;

use session_sync::{
    AUTH_COOKIE_NAME, BrowserOrigin, CacheData, ContextId, DurableMirror, IgnoreReason, InMemoryHistory,
    InMemoryResponseCache, MIRROR_ENVELOPE_KEY, Navigator, Reconciliation, Route, SharedStorage,
    TabContext, auth_token_from_headers,
};

use crate::common::{MockTab, TestUsers};

/// Cross-tab flows
///
/// These integration tests cover the observable behaviour of several tabs
/// sharing one origin:
/// - a login in one tab reaching tabs on the login screen and elsewhere
/// - a logout in one tab reaching every other tab
/// - operation with only the storage-change transport
/// - background listeners started with `start_sync`
/// Flow: Tab A signs in → Tab B (on /login) reads the mirror → B lands on the editor dashboard
#[tokio::test]
async fn test_login_in_one_tab_redirects_tab_on_login_screen() -> Result<(), Box<dyn std::error::Error>>
{
    let origin = BrowserOrigin::new();
    let a = MockTab::open(&origin, Route::Login).await;
    let mut b = MockTab::open(&origin, Route::Login).await;

    println!("🔐 Signing in from tab A");
    let route = a.tab.sign_in(TestUsers::editor()).await;
    assert_eq!(route, Route::EditorDashboard);

    let outcomes = b.drain().await;
    println!("  - Tab B reconciled: {outcomes:?}");

    assert_eq!(
        outcomes.first(),
        Some(&Reconciliation::LoggedIn {
            redirect: Some(Route::EditorDashboard)
        })
    );
    // The second transport's copy of the same login changes nothing
    assert!(
        outcomes[1..]
            .iter()
            .all(|outcome| *outcome == Reconciliation::Ignored(IgnoreReason::AlreadyCurrent))
    );

    let session = b.tab.current_session();
    assert!(session.authenticated);
    assert_eq!(session.credential(), Some("tok1"));
    assert_eq!(session.roles(), a.tab.current_session().roles());
    assert!(b.history.is_at(Route::EditorDashboard));
    assert_eq!(b.history.visited(), vec!["/editor/dashboard".to_string()]);

    println!("✅ Tab B followed tab A to the editor dashboard");
    Ok(())
}

#[tokio::test]
async fn test_login_does_not_move_tabs_already_in_the_app() {
    let origin = BrowserOrigin::new();
    let a = MockTab::open(&origin, Route::Login).await;
    let mut b = MockTab::open(&origin, Route::Login).await;
    b.history.visit("/submissions/17");

    a.tab.sign_in(TestUsers::editor()).await;
    b.drain().await;

    assert!(b.tab.current_session().authenticated);
    assert_eq!(b.history.current_path(), "/submissions/17");
}

#[tokio::test]
async fn test_multi_role_login_sends_login_screen_to_role_chooser() {
    let origin = BrowserOrigin::new();
    let a = MockTab::open(&origin, Route::Login).await;
    let mut b = MockTab::open(&origin, Route::Login).await;

    assert_eq!(
        a.tab.sign_in(TestUsers::chief_editor()).await,
        Route::RoleChooser
    );
    b.drain().await;

    assert!(b.history.is_at(Route::RoleChooser));
}

#[tokio::test]
async fn test_tab_never_hears_its_own_announcements() {
    // Given a single subscribed tab
    let origin = BrowserOrigin::new();
    let mut a = MockTab::open(&origin, Route::Login).await;

    // When it signs in and out
    a.tab.sign_in(TestUsers::reader()).await;
    a.tab.sign_out().await;

    // Then nothing is queued for it on either transport
    assert!(a.drain().await.is_empty());
    assert_eq!(
        a.history.visited(),
        vec!["/reader/dashboard".to_string(), "/login".to_string()]
    );
}

/// Flow: A and B signed in → B signs out → cookie, mirror and every session are cleared
#[tokio::test]
async fn test_logout_in_one_tab_clears_every_tab() -> Result<(), Box<dyn std::error::Error>> {
    let origin = BrowserOrigin::new();
    let mut a = MockTab::open(&origin, Route::Login).await;
    let mut b = MockTab::open(&origin, Route::Login).await;
    a.tab.sign_in(TestUsers::editor()).await;
    b.drain().await;
    a.cache
        .put(
            "submissions",
            "mine",
            CacheData {
                value: "[{\"id\":17}]".to_string(),
            },
        )
        .await;

    println!("🚪 Signing out from tab B");
    b.tab.sign_out().await;
    let outcomes = a.drain().await;
    println!("  - Tab A reconciled: {outcomes:?}");

    assert_eq!(outcomes.first(), Some(&Reconciliation::LoggedOut));
    for tab in [&a, &b] {
        assert!(!tab.tab.current_session().authenticated);
        assert_eq!(tab.tab.current_session().credential(), None);
        assert!(tab.history.is_at(Route::Login));
    }
    assert!(a.cache.is_empty().await);
    assert_eq!(origin.cookies().get(AUTH_COOKIE_NAME.as_str()).await, None);
    assert_eq!(origin.storage().get(MIRROR_ENVELOPE_KEY.as_str()).await?, None);

    println!("✅ Every tab is back on the login screen");
    Ok(())
}

/// Flow: A signs in → A signs out → C signs in → B and C catch up → C's login survives
#[tokio::test]
async fn test_late_logout_does_not_undo_newer_login() -> Result<(), Box<dyn std::error::Error>> {
    let origin = BrowserOrigin::new();
    let a = MockTab::open(&origin, Route::Login).await;
    let mut b = MockTab::open(&origin, Route::Login).await;
    let mut c = MockTab::open(&origin, Route::Login).await;

    a.tab.sign_in(TestUsers::editor()).await;
    a.tab.sign_out().await;
    c.tab.sign_in(TestUsers::reader()).await;

    println!("🔁 Tabs B and C replay queued events");
    let b_outcomes = b.drain().await;
    let c_outcomes = c.drain().await;
    println!("  - Tab B: {b_outcomes:?}");
    println!("  - Tab C: {c_outcomes:?}");

    assert!(!b_outcomes.contains(&Reconciliation::LoggedOut));
    assert!(!c_outcomes.contains(&Reconciliation::LoggedOut));
    for tab in [&b, &c] {
        assert_eq!(tab.tab.current_session().credential(), Some("tok-reader"));
    }
    assert!(b.history.is_at(Route::ReaderDashboard));
    assert!(c.history.is_at(Route::ReaderDashboard));

    let mirror = DurableMirror::new(origin.storage(), ContextId::new(), MIRROR_ENVELOPE_KEY.as_str())
        .read()
        .await?;
    assert_eq!(mirror, Some(TestUsers::reader()));
    assert_eq!(
        origin.cookies().get(AUTH_COOKIE_NAME.as_str()).await.as_deref(),
        Some("tok-reader")
    );

    println!("✅ The newest login survived the stale logout");
    Ok(())
}

#[tokio::test]
async fn test_cookie_carries_credential_to_request_paths() -> Result<(), Box<dyn std::error::Error>>
{
    let origin = BrowserOrigin::new();
    let a = MockTab::open(&origin, Route::Login).await;

    a.tab.sign_in(TestUsers::editor()).await;
    let headers = origin.cookies().request_headers("/api/submissions").await?;
    assert_eq!(auth_token_from_headers(&headers)?, Some("tok1"));

    a.tab.sign_out().await;
    let headers = origin.cookies().request_headers("/api/submissions").await?;
    assert_eq!(auth_token_from_headers(&headers)?, None);
    Ok(())
}

#[tokio::test]
async fn test_storage_transport_alone_is_enough() {
    // Given an origin whose environment lacks broadcast channels
    let origin = BrowserOrigin::without_broadcast();
    let a = MockTab::open(&origin, Route::Login).await;
    let mut b = MockTab::open(&origin, Route::Login).await;

    // When tab A signs in
    a.tab.sign_in(TestUsers::editor()).await;

    // Then tab B still follows through storage-change notifications
    assert_eq!(
        b.drain().await,
        vec![Reconciliation::LoggedIn {
            redirect: Some(Route::EditorDashboard)
        }]
    );

    // And a logout reaches it the same way
    a.tab.sign_out().await;
    assert_eq!(b.drain().await, vec![Reconciliation::LoggedOut]);
    assert!(b.history.is_at(Route::Login));
}

#[tokio::test]
async fn test_tab_opened_after_login_starts_authenticated() {
    let origin = BrowserOrigin::new();
    let a = MockTab::open(&origin, Route::Login).await;
    a.tab.sign_in(TestUsers::reader()).await;

    let late = MockTab::open(&origin, Route::Login).await;

    assert_eq!(late.tab.current_session().credential(), Some("tok-reader"));
    assert!(late.history.is_at(Route::ReaderDashboard));
}

/// Flow: three tabs with background listeners → sign in from one → the others converge
#[tokio::test]
async fn test_background_listeners_converge() -> Result<(), Box<dyn std::error::Error>> {
    let origin = BrowserOrigin::new();
    let mut tabs = Vec::new();
    for _ in 0..3 {
        let history = Arc::new(InMemoryHistory::at(Route::Login));
        let tab = TabContext::open(&origin, history.clone(), Arc::new(InMemoryResponseCache::new())).await;
        let guard = tab.start_sync();
        tabs.push((tab, history, guard));
    }

    tabs[0].0.sign_in(TestUsers::editor()).await;

    for (tab, history, _) in &tabs[1..] {
        let mut session = tab.session().subscribe();
        tokio::time::timeout(
            Duration::from_secs(2),
            session.wait_for(|session| session.credential() == Some("tok1")),
        )
        .await??;
        let mut state = history.watch();
        tokio::time::timeout(
            Duration::from_secs(2),
            state.wait_for(|state| state.current == Route::EditorDashboard.path()),
        )
        .await??;
    }

    tabs[2].0.sign_out().await;

    for (tab, history, _) in &tabs[..2] {
        let mut session = tab.session().subscribe();
        tokio::time::timeout(
            Duration::from_secs(2),
            session.wait_for(|session| !session.authenticated),
        )
        .await??;
        let mut state = history.watch();
        tokio::time::timeout(
            Duration::from_secs(2),
            state.wait_for(|state| state.current == Route::Login.path()),
        )
        .await??;
    }

    for (_, _, guard) in tabs {
        guard.stop().await;
    }
    Ok(())
}
