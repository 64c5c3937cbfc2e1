use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use session_sync::{
    AUTH_COOKIE_NAME, BrowserOrigin, ContextId, DurableMirror, MIRROR_ENVELOPE_KEY, Role, Route,
    Transport, UserData,
};

use crate::common::{MockTab, TestUsers};

const MAX_TABS: usize = 4;

/// One user per token so that a credential always implies the same profile.
fn user(index: usize) -> UserData {
    match index % 4 {
        0 => TestUsers::editor(),
        1 => TestUsers::reader(),
        2 => TestUsers::chief_editor(),
        _ => TestUsers::with_roles("tok-author", [Role::Reader, Role::Author]),
    }
}

#[derive(Debug, Clone)]
enum Op {
    SignIn { tab: usize, user: usize },
    SignOut { tab: usize },
    /// Hand the tab one queued event from one transport, if any.
    Deliver { tab: usize, transport: Transport },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0..MAX_TABS, 0..4usize).prop_map(|(tab, user)| Op::SignIn { tab, user }),
        1 => (0..MAX_TABS).prop_map(|tab| Op::SignOut { tab }),
        4 => (0..MAX_TABS, any::<bool>()).prop_map(|(tab, broadcast)| Op::Deliver {
            tab,
            transport: if broadcast {
                Transport::Broadcast
            } else {
                Transport::Storage
            },
        }),
    ]
}

async fn drain_until_quiescent(tabs: &mut [MockTab]) {
    loop {
        let mut progressed = false;
        for tab in tabs.iter_mut() {
            if !tab.drain().await.is_empty() {
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
}

async fn run_interleaving(
    tab_count: usize,
    ops: Vec<Op>,
    with_broadcast: bool,
) -> Result<(), TestCaseError> {
    let origin = if with_broadcast {
        BrowserOrigin::new()
    } else {
        BrowserOrigin::without_broadcast()
    };
    let mut tabs = Vec::with_capacity(tab_count);
    for _ in 0..tab_count {
        tabs.push(MockTab::open(&origin, Route::Login).await);
    }

    // Only explicit sign-ins and sign-outs may change the mirror
    let mut last_written: Option<UserData> = None;
    for op in ops {
        match op {
            Op::SignIn { tab, user: index } => {
                tabs[tab % tab_count].tab.sign_in(user(index)).await;
                last_written = Some(user(index));
            }
            Op::SignOut { tab } => {
                tabs[tab % tab_count].tab.sign_out().await;
                last_written = None;
            }
            Op::Deliver { tab, transport } => {
                tabs[tab % tab_count].deliver_one(transport).await;
            }
        }
    }

    drain_until_quiescent(&mut tabs).await;

    let mirror = DurableMirror::new(origin.storage(), ContextId::new(), MIRROR_ENVELOPE_KEY.as_str())
        .read()
        .await
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(&mirror, &last_written);
    let expected = mirror.unwrap_or_default();

    for tab in &tabs {
        let session = tab.tab.current_session();
        prop_assert_eq!(session.authenticated, expected.access_credential.is_some());
        prop_assert_eq!(&session.user_data, &expected);
    }
    prop_assert_eq!(
        origin.cookies().get(AUTH_COOKIE_NAME.as_str()).await,
        expected.access_credential.clone()
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any interleaving of sign-ins, sign-outs and partial deliveries ends,
    /// once every queued event is handled, with the mirror holding the last
    /// explicit action and every tab and the cookie agreeing with it.
    #[test]
    fn test_tabs_converge_on_mirror(
        tab_count in 2..=MAX_TABS,
        ops in prop::collection::vec(op_strategy(), 1..40),
        with_broadcast in any::<bool>(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        runtime.block_on(run_interleaving(tab_count, ops, with_broadcast))?;
    }
}
