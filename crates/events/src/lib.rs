//! Change notification plumbing.
//!
//! Stores publish a message after every state change; rendering layers hold a
//! [`Subscription`] and redraw when something arrives.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
