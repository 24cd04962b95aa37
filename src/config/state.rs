// Application state module
// Shared by every connection task

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use super::types::Config;
use crate::blog::{BlogDesk, TagRegistry};
use crate::store::RecordStore;
use crate::templates::TemplateEngine;

/// Application state
pub struct AppState {
    pub config: Config,

    /// Store and tag registry. Every request holds this lock across its
    /// whole load, mutate and save sequence.
    pub desk: Mutex<BlogDesk>,

    pub templates: TemplateEngine,

    /// Notified once on SIGINT/SIGTERM
    pub shutdown_signal: Arc<Notify>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, minijinja::Error> {
        let store = RecordStore::new(&config.storage.blogs_file);
        let tags = TagRegistry::with_seed(&config.blog.seed_tags);

        Ok(Self {
            config: config.clone(),
            desk: Mutex::new(BlogDesk::new(store, tags)),
            templates: TemplateEngine::new()?,
            shutdown_signal: Arc::new(Notify::new()),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        })
    }
}
