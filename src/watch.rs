// Debounced file watcher that drives `ApiStore` reloads. Watches the
// document's parent directory so editors that replace the file by
// rename are still observed. A failed reload keeps the previous
// snapshot in place.

use crate::store::ApiStore;
use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Copy, Debug)]
pub struct WatchConfig {
    pub debounce: Duration,
}

impl WatchConfig {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(debounce_ms.max(1)),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

pub struct WatchHandle {
    stop: Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WatchHandle {
    pub fn stop(mut self) {
        let _ = self.stop.send(());
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        let _ = self.stop.send(());
    }
}

pub fn start(store: Arc<ApiStore>, config: WatchConfig) -> Result<WatchHandle> {
    let (stop_tx, stop_rx) = mpsc::channel();
    let thread = thread::spawn(move || {
        if let Err(err) = run_loop(&store, config, stop_rx) {
            eprintln!("extapi: watch error: {err}");
        }
    });
    Ok(WatchHandle {
        stop: stop_tx,
        thread: Some(thread),
    })
}

fn run_loop(store: &ApiStore, config: WatchConfig, stop_rx: Receiver<()>) -> Result<()> {
    let (event_tx, event_rx) = mpsc::channel();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    })
    .context("create watcher")?;

    let target = store.path().to_path_buf();
    let watch_root = target.parent().unwrap_or(Path::new(".")).to_path_buf();
    watcher
        .watch(&watch_root, RecursiveMode::NonRecursive)
        .with_context(|| format!("watch {}", watch_root.display()))?;

    loop {
        match stop_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => return Ok(()),
            Err(TryRecvError::Empty) => {}
        }
        let first = match event_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        };
        let mut relevant = event_touches(&first, &target);
        // debounce window: coalesce the burst an editor save produces
        let deadline = std::time::Instant::now() + config.debounce;
        while let Some(remaining) = deadline.checked_duration_since(std::time::Instant::now()) {
            match event_rx.recv_timeout(remaining) {
                Ok(event) => relevant |= event_touches(&event, &target),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return Ok(()),
            }
        }
        if !relevant {
            continue;
        }
        match store.maybe_reload() {
            Ok(true) => {
                let version = store.snapshot().version().to_string();
                eprintln!("extapi: reloaded {} (version {version})", target.display());
            }
            Ok(false) => {}
            Err(err) => {
                eprintln!("extapi: reload failed, keeping previous snapshot: {err}");
            }
        }
    }
}

fn event_touches(event: &notify::Result<Event>, target: &Path) -> bool {
    match event {
        Ok(event) => {
            event.paths.is_empty()
                || event
                    .paths
                    .iter()
                    .any(|path| path.file_name() == target.file_name())
        }
        // watcher errors are treated as "recheck the document"
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use std::path::PathBuf;

    #[test]
    fn config_clamps_zero_debounce() {
        assert_eq!(WatchConfig::new(0).debounce, Duration::from_millis(1));
        assert_eq!(WatchConfig::new(250).debounce, Duration::from_millis(250));
    }

    #[test]
    fn events_are_filtered_by_file_name() {
        let target = PathBuf::from("/data/extension_api.json");
        let mut event = Event::new(EventKind::Any);
        event.paths.push(PathBuf::from("/data/other.json"));
        assert!(!event_touches(&Ok(event), &target));

        let mut event = Event::new(EventKind::Any);
        event.paths.push(PathBuf::from("/tmp/extension_api.json"));
        assert!(event_touches(&Ok(event), &target));

        // pathless events and watcher errors both force a recheck
        assert!(event_touches(&Ok(Event::new(EventKind::Any)), &target));
        assert!(event_touches(
            &Err(notify::Error::generic("boom")),
            &target
        ));
    }

    #[test]
    fn handle_stops_the_worker_thread() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("extension_api.json");
        std::fs::write(&path, "{}").unwrap();
        let store = Arc::new(ApiStore::open(&path).unwrap());
        let handle = start(store, WatchConfig::new(10)).unwrap();
        handle.stop();
    }
}
