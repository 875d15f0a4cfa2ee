use std::sync::Arc;

use crate::config::Config;
use crate::store::Store;

pub mod auth;
pub mod config;
pub mod csv;
pub mod error;
pub mod import;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod store;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: Config,
}
