//! Single-threaded pub/sub event bus for the dock's main loop.
//!
//! Architecture:
//! - Components subscribe to event types with callbacks (immediate invocation)
//! - emit() invokes callbacks immediately AND queues for deferred processing
//! - poll() drains queued events in emission order for the main loop
//!
//! Everything here lives on the UI thread (`Rc`/`RefCell`), matching the
//! preview controller, which is not meant to be shared across threads.
//! Callbacks may emit further events; those are queued after the current one.

use log::warn;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

/// Maximum events in queue before the oldest half is evicted
const MAX_QUEUE_SIZE: usize = 256;

/// Marker trait for events.
pub trait Event: Any {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<T: Any> Event for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

type Callback = Rc<dyn Fn(&dyn Any)>;

/// Boxed event for queue storage
pub type BoxedEvent = Box<dyn Event>;

#[derive(Default)]
struct BusInner {
    subscribers: HashMap<TypeId, Vec<Callback>>,
    queue: VecDeque<BoxedEvent>,
}

impl BusInner {
    fn callbacks_for(&self, type_id: TypeId) -> Vec<Callback> {
        self.subscribers.get(&type_id).cloned().unwrap_or_default()
    }

    fn enqueue(&mut self, event: BoxedEvent) {
        if self.queue.len() >= MAX_QUEUE_SIZE {
            let evict_count = self.queue.len() / 2;
            warn!(
                "EventBus queue full ({} events), evicting oldest {}",
                self.queue.len(),
                evict_count
            );
            self.queue.drain(0..evict_count);
        }
        self.queue.push_back(event);
    }
}

/// Shared dispatch used by both the bus and its emitter handles.
///
/// Callbacks are cloned out before being invoked so a callback may emit
/// again without hitting an outstanding `RefCell` borrow.
fn dispatch(inner: &RefCell<BusInner>, event: BoxedEvent) {
    let type_id = (*event).as_any().type_id();
    let callbacks = inner.borrow().callbacks_for(type_id);
    for cb in &callbacks {
        cb((*event).as_any());
    }
    inner.borrow_mut().enqueue(event);
}

/// Pub/Sub event bus with deferred processing.
///
/// Cloning yields another handle onto the same subscribers and queue.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("subscriber_types", &inner.subscribers.len())
            .field("queue_len", &inner.queue.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of type E. The callback runs synchronously inside emit().
    pub fn subscribe<E, F>(&self, callback: F)
    where
        E: Event,
        F: Fn(&E) + 'static,
    {
        let wrapped: Callback = Rc::new(move |any: &dyn Any| {
            if let Some(event) = any.downcast_ref::<E>() {
                callback(event);
            }
        });
        self.inner
            .borrow_mut()
            .subscribers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Emit event: invoke callbacks immediately AND queue for poll().
    pub fn emit<E: Event>(&self, event: E) {
        dispatch(&self.inner, Box::new(event));
    }

    /// Emit an already boxed event (UI dispatch closures hand these over).
    pub fn emit_boxed(&self, event: BoxedEvent) {
        dispatch(&self.inner, event);
    }

    /// Drain all queued events, oldest first.
    pub fn poll(&self) -> Vec<BoxedEvent> {
        self.inner.borrow_mut().queue.drain(..).collect()
    }

    /// Emitter handle for components that only publish (engine, render handler).
    pub fn emitter(&self) -> EventEmitter {
        EventEmitter {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.inner.borrow().queue.len()
    }
}

/// Publish-only handle onto an [`EventBus`].
#[derive(Clone)]
pub struct EventEmitter {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("queue_len", &self.inner.borrow().queue.len())
            .finish()
    }
}

impl EventEmitter {
    pub fn emit<E: Event>(&self, event: E) {
        dispatch(&self.inner, Box::new(event));
    }

    pub fn emit_boxed(&self, event: BoxedEvent) {
        dispatch(&self.inner, event);
    }
}

/// Downcast a queued event to its concrete type.
///
/// The explicit `**event` deref matters: `Box<dyn Event>` itself satisfies
/// the blanket `Event` impl, and calling `as_any()` on the box would yield
/// the box's own type instead of the event inside it.
#[inline]
pub fn downcast_event<E: Event>(event: &BoxedEvent) -> Option<&E> {
    (**event).as_any().downcast_ref::<E>()
}
