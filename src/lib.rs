pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;

use db::DbPool;

// Struct representing the application state
pub struct AppState {
    pub db: DbPool,
}
