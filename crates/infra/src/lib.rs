mod config;
mod repos;
mod system;

pub use config::Config;
pub use repos::{IEventRepo, InMemoryEventRepo, Repos};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct CalendarContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl CalendarContext {
    /// Context backed by in-memory storage and the real clock
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> CalendarContext {
    CalendarContext::create_inmemory()
}
