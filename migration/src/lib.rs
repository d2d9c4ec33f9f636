pub use sea_orm_migration::prelude::*;
mod enums;
mod m20250301_000001_create_site_tables;
mod m20250301_000002_add_authentication;
mod macros;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_site_tables::Migration),
            Box::new(m20250301_000002_add_authentication::Migration),
        ]
    }
}
