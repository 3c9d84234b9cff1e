//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_grid_areas;
mod m20240101_000002_create_metering_points;
mod m20240101_000003_create_energy_suppliers;
mod m20240101_000004_create_business_processes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_grid_areas::Migration),
            Box::new(m20240101_000002_create_metering_points::Migration),
            Box::new(m20240101_000003_create_energy_suppliers::Migration),
            Box::new(m20240101_000004_create_business_processes::Migration),
        ]
    }
}
