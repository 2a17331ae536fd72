//! Progress-callback trait for per-drink pipeline events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the pipeline works through each input key. The callback approach keeps
//! the library ignorant of how the host application talks to its user — the
//! CLI forwards events to an indicatif bar; a service could forward them to
//! a channel or a database row.
//!
//! The pipeline is strictly sequential, so events for different drinks never
//! overlap; the trait is still `Send + Sync` so callbacks can be shared with
//! other threads owned by the host.

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it processes each input key.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Exactly one of `on_drink_rendered` /
/// `on_drink_not_found` fires per key — together they are the "one progress
/// tick per key regardless of outcome" contract.
pub trait RunProgressCallback: Send + Sync {
    /// Called once after the input file has been collected.
    ///
    /// # Arguments
    /// * `total_drinks` — number of canonical keys that will be processed
    fn on_run_start(&self, total_drinks: usize) {
        let _ = total_drinks;
    }

    /// Called just before the lookup request is sent for a key.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in the input order
    /// * `total` — total keys in the run
    /// * `key`   — the canonical key being looked up
    fn on_drink_start(&self, index: usize, total: usize, key: &str) {
        let _ = (index, total, key);
    }

    /// Called when a drink was found and its document written.
    ///
    /// # Arguments
    /// * `name`     — the recipe name as returned by the catalogue
    /// * `document` — path of the written document
    fn on_drink_rendered(&self, index: usize, total: usize, name: &str, document: &Path) {
        let _ = (index, total, name, document);
    }

    /// Called when the catalogue had no match for a key. Not an error;
    /// the run continues with the next key.
    fn on_drink_not_found(&self, index: usize, total: usize, key: &str) {
        let _ = (index, total, key);
    }

    /// Called once after every key has been attempted.
    ///
    /// # Arguments
    /// * `total`    — total keys in the run
    /// * `rendered` — keys that produced a document
    fn on_run_complete(&self, total: usize, rendered: usize) {
        let _ = (total, rendered);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        rendered: AtomicUsize,
        not_found: AtomicUsize,
        completed_rendered: AtomicUsize,
    }

    impl RunProgressCallback for TrackingCallback {
        fn on_drink_start(&self, _index: usize, _total: usize, _key: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_drink_rendered(&self, _index: usize, _total: usize, _name: &str, _doc: &Path) {
            self.rendered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_drink_not_found(&self, _index: usize, _total: usize, _key: &str) {
            self.not_found.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _total: usize, rendered: usize) {
            self.completed_rendered.store(rendered, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(3);
        cb.on_drink_start(1, 3, "negroni");
        cb.on_drink_rendered(1, 3, "Negroni", Path::new("recipes/Negroni.md"));
        cb.on_drink_not_found(2, 3, "no_such_drink");
        cb.on_run_complete(3, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            rendered: AtomicUsize::new(0),
            not_found: AtomicUsize::new(0),
            completed_rendered: AtomicUsize::new(0),
        };

        tracker.on_run_start(2);
        tracker.on_drink_start(1, 2, "gin_tonic");
        tracker.on_drink_rendered(1, 2, "Gin Tonic", Path::new("recipes/Gin Tonic.md"));
        tracker.on_drink_start(2, 2, "missing");
        tracker.on_drink_not_found(2, 2, "missing");
        tracker.on_run_complete(2, 1);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.rendered.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.not_found.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completed_rendered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn RunProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
        cb.on_drink_start(1, 10, "random");
    }
}
