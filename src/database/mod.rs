pub mod manager;
pub mod schema;
pub mod export;
pub mod handlers;

pub use manager::DatabaseManager;
pub use export::default_export_path;
pub use handlers::run_database_handler;
