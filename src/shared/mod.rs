//! Cross-cutting types shared by every layer

pub mod errors;
pub mod pagination;
pub mod shutdown;

pub use errors::{AppError, DomainError, InfraError};
pub use pagination::{Page, PaginatedResult, PaginationParams};
pub use shutdown::{listen_for_shutdown_signals, ShutdownCoordinator, ShutdownSignal};
