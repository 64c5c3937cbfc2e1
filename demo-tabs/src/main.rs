use std::sync::Arc;
use std::time::Duration;

use session_sync::{
    BrowserOrigin, InMemoryHistory, InMemoryResponseCache, Navigator, Role, Route, SyncGuard,
    TabContext, UserData, UserProfile,
};

mod logging;

struct DemoTab {
    name: &'static str,
    tab: TabContext,
    history: Arc<InMemoryHistory>,
    _sync: SyncGuard,
}

impl DemoTab {
    async fn open(origin: &BrowserOrigin, name: &'static str, route: Route) -> Self {
        let history = Arc::new(InMemoryHistory::at(route));
        let tab = TabContext::open(origin, history.clone(), Arc::new(InMemoryResponseCache::new())).await;
        let sync = tab.start_sync();
        tracing::info!("Opened {} ({}) at {}", name, tab.id(), history.current_path());
        Self {
            name,
            tab,
            history,
            _sync: sync,
        }
    }

    fn report(&self) {
        let session = self.tab.current_session();
        let roles: Vec<String> = session.roles().iter().map(Role::to_string).collect();
        println!(
            "  {:<8} authenticated={:<5} credential={:<8} roles={:<20} at {}",
            self.name,
            session.authenticated,
            session.credential().unwrap_or("-"),
            roles.join(","),
            self.history.current_path()
        );
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init_tracing("demo_tabs");

    let origin = BrowserOrigin::new();
    let tabs = [
        DemoTab::open(&origin, "tab-a", Route::Login).await,
        DemoTab::open(&origin, "tab-b", Route::Login).await,
        DemoTab::open(&origin, "tab-c", Route::ReaderDashboard).await,
    ];

    println!("Signing in from tab-a as READER + EDITOR");
    let mut profile = UserProfile::new("u-1", "Ada Editor", [Role::Reader, Role::Editor]);
    profile.email = Some("ada@example.com".to_string());
    tabs[0].tab.sign_in(UserData::new("tok1", profile)).await;
    settle().await;
    tabs.iter().for_each(DemoTab::report);

    println!("Signing out from tab-b");
    tabs[1].tab.sign_out().await;
    settle().await;
    tabs.iter().for_each(DemoTab::report);

    let everyone_out = tabs
        .iter()
        .all(|t| !t.tab.current_session().authenticated && t.history.is_at(Route::Login));
    if !everyone_out {
        return Err("tabs did not converge on the logged-out state".into());
    }
    println!("All tabs are back on the login screen");
    Ok(())
}
