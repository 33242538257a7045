//! `sonarbridge-middleware` – The Message Bus
//!
//! Routes asynchronous sensor traffic between the sonar source, the
//! translation node, and any downstream consumer without caring about the
//! data's meaning.
//!
//! # Modules
//!
//! - [`bus`] – Headless, typed, topic-based publish/subscribe event bus built
//!   on Tokio broadcast channels.

pub mod bus;

pub use bus::{EventBus, Topic, TopicReceiver};
