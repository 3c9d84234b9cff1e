//! # Metering Point Service
//!
//! Registry of electricity metering points. Market actors submit documents
//! that start business processes; each process is checked against the
//! business rules, persisted, and answered with a confirmation or rejection
//! on the integration event bus.
//!
//! ## Architecture
//!
//! - **domain**: value objects, enumerations, business rules and aggregates
//! - **application**: business processes, market documents, event bus
//! - **infrastructure**: SeaORM storage and in-memory repositories
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::create_api_router;

pub use application::{create_event_bus, EventBus, IntegrationEvent, SharedEventBus};
