use tokio::sync::watch;

use super::route::Route;

/// Current-screen lookup and navigation primitive of a context.
pub trait Navigator: Send + Sync + 'static {
    fn current_path(&self) -> String;

    fn navigate_to(&self, route: Route);

    fn is_at(&self, route: Route) -> bool {
        Route::from_path(&self.current_path()) == Some(route)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
    pub current: String,
    /// Paths navigated to after the initial one, oldest first.
    pub visited: Vec<String>,
}

/// Navigator that only records where it has been.
pub struct InMemoryHistory {
    state: watch::Sender<HistoryState>,
}

impl InMemoryHistory {
    pub fn new(initial_path: impl Into<String>) -> Self {
        let (state, _) = watch::channel(HistoryState {
            current: initial_path.into(),
            visited: Vec::new(),
        });
        Self { state }
    }

    pub fn at(route: Route) -> Self {
        Self::new(route.path())
    }

    /// Navigate to an arbitrary path, as a user clicking through the app would.
    pub fn visit(&self, path: impl Into<String>) {
        let path = path.into();
        self.state.send_modify(|state| {
            state.visited.push(path.clone());
            state.current = path;
        });
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.borrow().visited.clone()
    }

    pub fn watch(&self) -> watch::Receiver<HistoryState> {
        self.state.subscribe()
    }
}

impl Navigator for InMemoryHistory {
    fn current_path(&self) -> String {
        self.state.borrow().current.clone()
    }

    fn navigate_to(&self, route: Route) {
        tracing::debug!("Navigating to {}", route);
        self.visit(route.path());
    }
}
