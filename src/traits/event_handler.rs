use async_trait::async_trait;
use crate::errors::OrganizerResult;
use crate::structs::domain_event::DomainEvent;

/// A subscriber on the `EventBus`.
///
/// Every handler is awaited before `dispatch` returns. Immediate handlers run one after
/// another in registration order; deferred handlers run concurrently with each other.
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &str;

    async fn handle(&self, event: &DomainEvent) -> OrganizerResult<()>;

    fn is_deferred(&self) -> bool {
        false
    }
}
