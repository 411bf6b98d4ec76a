pub mod api;
pub mod config;
pub mod db;
pub mod lifecycle;
pub mod storage;

pub use db::DbPool;

use config::Config;
use std::sync::Arc;
use storage::BlobStore;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub blobs: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, blobs: Arc<dyn BlobStore>) -> Self {
        Self { config, db, blobs }
    }
}
