//! Application layer
//!
//! Turns market documents into business processes. Every process ends with
//! a confirmation or rejection published on the event bus.

pub mod events;
pub mod market;
pub mod services;

pub use events::{create_event_bus, EventBus, IntegrationEvent, SharedEventBus};
pub use market::{BusinessProcessResult, MarketDocument};
pub use services::{GridAreaService, MeteringPointService};
