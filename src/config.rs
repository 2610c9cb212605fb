use std::{env, net::SocketAddr, path::PathBuf};

use crate::error::AppError;

pub const DATABASE_FILE: &str = "database.db";
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub static_root: PathBuf,
    pub body_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url());
        let listen_addr: SocketAddr = env::var("APP_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let static_root = match env::var("STATIC_ROOT") {
            Ok(root) => PathBuf::from(root),
            Err(_) => env::current_dir()?,
        };

        let body_limit = match env::var("APP_BODY_LIMIT") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid APP_BODY_LIMIT: {err}")))?,
            Err(_) => DEFAULT_BODY_LIMIT,
        };

        Ok(Self {
            database_url,
            listen_addr,
            static_root,
            body_limit,
        })
    }
}

/// The database lives next to the server binary, independent of the
/// working directory it was started from.
fn default_database_url() -> String {
    let dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_default();
    format!("sqlite://{}", dir.join(DATABASE_FILE).to_string_lossy())
}
