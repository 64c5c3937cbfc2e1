mod history;
mod redirect;
mod route;

pub use history::{HistoryState, InMemoryHistory, Navigator};
pub use redirect::decide_redirect;
pub use route::Route;
