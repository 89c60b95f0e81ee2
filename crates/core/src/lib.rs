//! relay-core: routing core of the relay push engine
//!
//! This crate provides:
//! - Events, subject subscriptions and the subscriber capability
//! - The session registry with its lazily rebuilt snapshot and lease aging
//! - The dispatcher: broadcast, multicast and unicast fan-out
//! - Configuration and the process-wide engine context

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod error;
pub mod id;

// Data model (order matters for dependencies)
pub mod event;
pub mod subscription;
pub mod subscriber;
pub mod session;

pub mod context;
pub mod dispatch;
pub mod registry;

#[cfg(test)]
mod testing;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock, TickTimer};
pub use config::{AgingConfig, Config, SessionConfig};
pub use context::{Context, EngineContext};
pub use dispatch::Dispatcher;
pub use error::{BootstrapError, ConfigError, DeliveryError};
pub use event::Event;
pub use id::{IdGen, IdGeneration, RandomNameGen, SessionIdGen, UuidIdGen};
pub use registry::{RegistryConfig, SessionManager, SessionTable, Snapshot};
pub use session::{Session, SessionId, SessionStatus};
pub use subscriber::{EventReceiver, QueueSubscriber, Subscriber};
pub use subscription::{SubjectPattern, Subscription, SubscriptionId};
