pub mod actions;
pub mod config;
pub mod draft;
pub mod error;
pub mod export;
pub mod flow;
pub mod kanban;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod router;
pub mod seed;
pub mod state;
pub mod timeline;

pub use actions::*;
pub use reducer::*;
pub use state::*;

pub use config::GalleyConfig;
pub use persistence::PreferenceStore;
