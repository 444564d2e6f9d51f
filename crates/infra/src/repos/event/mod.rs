mod inmemory;

pub use inmemory::InMemoryEventRepo;
use onboarding_calendar_domain::{CalendarEvent, ID};

/// Storage of `CalendarEvent`s. Only the events themselves are stored,
/// their instances are always derived when queried.
#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    async fn insert(&self, e: &CalendarEvent) -> anyhow::Result<()>;
    async fn save(&self, e: &CalendarEvent) -> anyhow::Result<()>;
    async fn find(&self, event_id: &ID) -> Option<CalendarEvent>;
    async fn find_all(&self) -> anyhow::Result<Vec<CalendarEvent>>;
    async fn delete(&self, event_id: &ID) -> Option<CalendarEvent>;
}
