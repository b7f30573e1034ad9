//! Asset worker
//!
//! A worker that hands every request to its `ASSETS` binding, together with
//! the host that runs it and a directory-backed asset binding.

pub mod assets;
pub mod config;
pub mod http;
pub mod logger;
pub mod server;
pub mod worker;

use std::sync::Arc;

use crate::assets::DirectoryAssets;
use crate::config::Config;
use crate::worker::Env;

/// Environment with the asset binding registered under its configured name
pub fn build_env(config: &Config) -> worker::Result<Env> {
    let assets = DirectoryAssets::new(config.assets.clone())?;
    Ok(Env::new().with_assets(config.assets.binding.clone(), Arc::new(assets)))
}
