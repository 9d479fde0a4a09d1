pub mod app;
pub mod calendar;
pub mod controller;
pub mod errors;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod records;
pub mod report_config;
pub mod sanitize;
pub mod settings;
pub mod state;
pub mod table;
pub mod ui;

pub use app::router;
pub use settings::Settings;
pub use state::AppState;
