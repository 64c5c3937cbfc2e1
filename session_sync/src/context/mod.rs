mod origin;
mod tab;

pub use origin::BrowserOrigin;
pub use tab::TabContext;
