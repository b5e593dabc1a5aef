use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use async_trait::async_trait;
use futures::future::join_all;
use crate::enums::event_kind::EventKind;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::structs::domain_event::DomainEvent;
use crate::traits::event_handler::EventHandler;

struct Subscription {
    kind: EventKind,
    handler: Arc<dyn EventHandler>,
}

fn same_handler(a: &Arc<dyn EventHandler>, b: &Arc<dyn EventHandler>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// In-process publish/subscribe dispatcher. One instance is built per run and shared
/// by reference; there is no global bus.
///
/// Handler failures are not swallowed: every matching handler still runs, and the
/// first failure is returned from `dispatch`.
#[derive(Default)]
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
    dispatched: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if this handler was already registered for `kind`.
    pub fn register(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> bool {
        let mut subscriptions = self.subscriptions.write().unwrap_or_else(PoisonError::into_inner);

        if subscriptions.iter().any(|s| s.kind == kind && same_handler(&s.handler, &handler)) {
            return false;
        }

        log::debug!("Registered '{}' for {kind}", handler.name());
        subscriptions.push(Subscription { kind, handler });
        true
    }

    pub fn unregister(&self, kind: EventKind, handler: &Arc<dyn EventHandler>) -> bool {
        let mut subscriptions = self.subscriptions.write().unwrap_or_else(PoisonError::into_inner);
        let before = subscriptions.len();
        subscriptions.retain(|s| !(s.kind == kind && same_handler(&s.handler, handler)));
        subscriptions.len() != before
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }

    pub fn dispatched_count(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Handlers for the event's kind or one of its supertypes, in registration order,
    /// each at most once.
    fn handlers_for(&self, kind: EventKind) -> Vec<Arc<dyn EventHandler>> {
        let subscriptions = self.subscriptions.read().unwrap_or_else(PoisonError::into_inner);
        let mut handlers: Vec<Arc<dyn EventHandler>> = Vec::new();

        for subscription in subscriptions.iter().filter(|s| s.kind.accepts(kind)) {
            if !handlers.iter().any(|h| same_handler(h, &subscription.handler)) {
                handlers.push(Arc::clone(&subscription.handler));
            }
        }
        handlers
    }

    pub async fn dispatch(&self, event: &DomainEvent) -> OrganizerResult<()> {
        let kind = event.kind();
        let handlers = self.handlers_for(kind);
        self.dispatched.fetch_add(1, Ordering::Relaxed);

        if handlers.is_empty() {
            log::warn!("No handlers registered for {kind} ({})", event.aggregate_id());
            return Ok(());
        }

        let (deferred, immediate): (Vec<_>, Vec<_>) =
            handlers.into_iter().partition(|h| h.is_deferred());

        let mut first_error = None;

        for handler in &immediate {
            if let Err(e) = Self::run_handler(handler, event).await {
                first_error.get_or_insert(e);
            }
        }

        let outcomes = join_all(deferred.iter().map(|h| Self::run_handler(h, event))).await;
        for outcome in outcomes {
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    async fn run_handler(handler: &Arc<dyn EventHandler>, event: &DomainEvent) -> OrganizerResult<()> {
        handler.handle(event).await.map_err(|e| {
            log::error!(
                "❌ Handler '{}' failed on {} for {}: {e}",
                handler.name(),
                event.kind(),
                event.aggregate_id()
            );
            match e {
                OrganizerError::EventHandler { .. } => e,
                other => OrganizerError::EventHandler {
                    handler: handler.name().to_string(),
                    event_type: event.kind().to_string(),
                    reason: other.to_string(),
                },
            }
        })
    }
}

/// Adapts a closure into an `EventHandler`.
pub struct FnHandler<F> {
    name: String,
    deferred: bool,
    callback: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&DomainEvent) -> OrganizerResult<()> + Send + Sync,
{
    pub fn immediate(name: &str, callback: F) -> Self {
        Self {
            name: name.to_string(),
            deferred: false,
            callback,
        }
    }

    pub fn deferred(name: &str, callback: F) -> Self {
        Self {
            name: name.to_string(),
            deferred: true,
            callback,
        }
    }
}

#[async_trait]
impl<F> EventHandler for FnHandler<F>
where
    F: Fn(&DomainEvent) -> OrganizerResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &DomainEvent) -> OrganizerResult<()> {
        (self.callback)(event)
    }

    fn is_deferred(&self) -> bool {
        self.deferred
    }
}
