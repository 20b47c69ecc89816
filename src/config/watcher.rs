//! Annotation source watcher for hot reconciliation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_annotations;

/// A watcher that monitors the annotation source file for changes.
pub struct AnnotationWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<HashMap<String, String>>,
}

impl AnnotationWatcher {
    /// Create a new AnnotationWatcher.
    ///
    /// Returns the watcher and a receiver for annotation updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<HashMap<String, String>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Annotation source change detected, reloading...");
                        match load_annotations(&path) {
                            Ok(data) => {
                                let _ = tx.send(data);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload annotations: {}. Keeping current values.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Annotation watcher started");
        Ok(watcher)
    }
}
