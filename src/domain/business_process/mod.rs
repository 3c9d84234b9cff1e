pub mod model;
pub mod repository;

pub use model::{BusinessProcess, BusinessProcessStatus, BusinessProcessType};
pub use repository::BusinessProcessRepository;
