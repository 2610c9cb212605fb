use crate::{config::AppConfig, services::store::RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: RecordStore,
}

impl AppState {
    pub fn new(config: AppConfig, store: RecordStore) -> Self {
        Self { config, store }
    }
}
