//! Observer-style event dispatch.
//!
//! The host emits an `Event` and the dispatcher runs every handler registered
//! for that event's `HookPoint`, in registration order. Each handler receives
//! the event as returned by the previous handler, so filter-style events are
//! transformed along the chain.
//!
//! A handler that returns `Err` stops the chain: no later handler runs and
//! the error is returned to the host unchanged. An `AccessDenied` error is
//! terminal for the whole request.

use std::collections::HashMap;

use tracing::{debug, warn};

use sitemgr_contracts::{
    error::{SiteManagerError, SiteResult},
    event::{Event, HookPoint},
};

use crate::context::RequestContext;

/// A handler subscribed to one interception point.
pub trait EventHandler: Send + Sync {
    /// Inspect `event`, optionally correct host state, and return the event
    /// for the next handler. Returning `Err` aborts the chain.
    fn handle(&self, ctx: &RequestContext, event: Event) -> SiteResult<Event>;
}

impl<F> EventHandler for F
where
    F: Fn(&RequestContext, Event) -> SiteResult<Event> + Send + Sync,
{
    fn handle(&self, ctx: &RequestContext, event: Event) -> SiteResult<Event> {
        self(ctx, event)
    }
}

/// Registry of event handlers keyed by interception point.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<HookPoint, Vec<Box<dyn EventHandler>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `point`. Handlers run in registration order.
    pub fn on(&mut self, point: HookPoint, handler: impl EventHandler + 'static) {
        self.handlers.entry(point).or_default().push(Box::new(handler));
    }

    /// Number of handlers subscribed to `point`.
    pub fn handler_count(&self, point: HookPoint) -> usize {
        self.handlers.get(&point).map_or(0, Vec::len)
    }

    /// Run every handler for the event's point and return the final event.
    ///
    /// # Errors
    ///
    /// Returns the first handler error. Returns `HostError` if a handler
    /// hands back an event of a different kind than it received.
    pub fn emit(&self, ctx: &RequestContext, event: Event) -> SiteResult<Event> {
        let point = event.point();
        let Some(handlers) = self.handlers.get(&point) else {
            return Ok(event);
        };

        debug!(
            request_id = %ctx.request_id,
            point = %point,
            handlers = handlers.len(),
            "dispatching event"
        );

        let mut current = event;
        for (position, handler) in handlers.iter().enumerate() {
            current = match handler.handle(ctx, current) {
                Ok(next) => next,
                Err(err) => {
                    // Denials are logged by the handler that builds them.
                    if err.is_access_denied() {
                        debug!(
                            request_id = %ctx.request_id,
                            point = %point,
                            position,
                            "handler denied event"
                        );
                    } else {
                        warn!(
                            request_id = %ctx.request_id,
                            point = %point,
                            position,
                            error = %err,
                            "handler aborted event"
                        );
                    }
                    return Err(err);
                }
            };

            if current.point() != point {
                return Err(SiteManagerError::HostError {
                    reason: format!(
                        "handler {} for '{}' returned a '{}' event",
                        position,
                        point,
                        current.point()
                    ),
                });
            }
        }

        Ok(current)
    }
}
