pub mod business_processes;
pub mod grid_areas;
pub mod health;
pub mod metering_points;
pub mod metrics;
pub mod request_id;
