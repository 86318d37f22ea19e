//! Asynchronous asset request.
//!
//! The read and parse run on a worker thread. A second watcher thread
//! reports a timeout if the worker has not finished in time; it never
//! cancels the worker, so a late result is still delivered. Both threads
//! only talk to the caller through the event sink.

use std::any::Any;
use std::fs::File;
use std::io::Read;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

use crate::loader::{AssetLoader, LoadedAsset};

const CHUNK_SIZE: usize = 64 * 1024;

/// Bytes read so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub loaded: u64,
    /// Unknown when the file size could not be queried.
    pub total: Option<u64>,
}

impl Progress {
    pub fn percent(&self) -> Option<f32> {
        match self.total {
            Some(0) => Some(100.0),
            Some(total) => Some(self.loaded as f32 / total as f32 * 100.0),
            None => None,
        }
    }
}

/// Result of one request; exactly one is delivered.
#[derive(Debug)]
pub enum LoadOutcome {
    Success(LoadedAsset),
    Failure(anyhow::Error),
}

#[derive(Debug)]
pub enum LoadEvent {
    Progress(Progress),
    Finished(LoadOutcome),
    /// No outcome within the timeout. The request keeps running.
    TimedOut { after: Duration },
}

/// Reads a file in chunks, reporting progress after each chunk.
pub fn read_with_progress(path: &Path, mut on_progress: impl FnMut(Progress)) -> Result<Vec<u8>> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open asset: {}", path.display()))?;
    let total = file.metadata().ok().map(|m| m.len());
    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file
            .read(&mut chunk)
            .with_context(|| format!("Failed to read asset: {}", path.display()))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        on_progress(Progress {
            loaded: bytes.len() as u64,
            total,
        });
    }
    Ok(bytes)
}

/// Synchronous read + parse. The asset is named after the file stem
/// when the format carries no name of its own.
pub fn load_asset(
    path: &Path,
    loader: &dyn AssetLoader,
    on_progress: impl FnMut(Progress),
) -> Result<LoadedAsset> {
    let bytes = read_with_progress(path, on_progress)?;
    let mut asset = loader
        .parse(&bytes, path.parent())
        .with_context(|| format!("{} loader rejected {}", loader.name(), path.display()))?;
    if asset.name.is_empty() {
        asset.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(asset)
}

/// One fire-and-forget load of `path`.
pub struct AssetRequest {
    path: PathBuf,
    loader: Arc<dyn AssetLoader>,
    timeout: Duration,
}

/// Threads of a spawned request. Dropping it detaches them.
pub struct RequestHandle {
    worker: JoinHandle<()>,
    watcher: JoinHandle<()>,
}

impl RequestHandle {
    /// Blocks until both threads exit.
    pub fn join(self) {
        let _ = self.worker.join();
        let _ = self.watcher.join();
    }
}

impl AssetRequest {
    pub fn new(path: impl Into<PathBuf>, loader: Arc<dyn AssetLoader>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            loader,
            timeout,
        }
    }

    /// Starts the worker and the timeout watcher. Events arrive on `sink`
    /// from either thread.
    pub fn spawn<S>(self, sink: S) -> Result<RequestHandle>
    where
        S: Fn(LoadEvent) + Clone + Send + 'static,
    {
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let timeout = self.timeout;

        let watcher_sink = sink.clone();
        let watcher = thread::Builder::new()
            .name("asset-timeout".into())
            .spawn(move || watch_worker(&done_rx, timeout, watcher_sink))
            .context("Failed to spawn asset timeout watcher")?;

        let AssetRequest { path, loader, .. } = self;
        let worker = thread::Builder::new()
            .name("asset-load".into())
            .spawn(move || {
                let progress_sink = sink.clone();
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    load_asset(&path, loader.as_ref(), |p| {
                        progress_sink(LoadEvent::Progress(p))
                    })
                }))
                .unwrap_or_else(|payload| {
                    Err(anyhow!(
                        "{} loader panicked on {}: {}",
                        loader.name(),
                        path.display(),
                        panic_message(payload.as_ref())
                    ))
                });
                let _ = done_tx.send(());
                let outcome = match result {
                    Ok(asset) => LoadOutcome::Success(asset),
                    Err(e) => LoadOutcome::Failure(e),
                };
                sink(LoadEvent::Finished(outcome));
            })
            .context("Failed to spawn asset loader")?;

        Ok(RequestHandle { worker, watcher })
    }
}

/// Waits for the worker's done signal. Past `timeout` it reports once and
/// keeps waiting, so a worker that dies without signalling is still
/// turned into a failure.
fn watch_worker(done: &Receiver<()>, timeout: Duration, sink: impl Fn(LoadEvent)) {
    let started = Instant::now();
    let signalled = match done.recv_timeout(timeout) {
        Ok(()) => true,
        Err(RecvTimeoutError::Disconnected) => false,
        Err(RecvTimeoutError::Timeout) => {
            sink(LoadEvent::TimedOut {
                after: started.elapsed(),
            });
            done.recv().is_ok()
        }
    };
    if !signalled {
        log::error!("Asset worker stopped without a result");
        sink(LoadEvent::Finished(LoadOutcome::Failure(anyhow!(
            "asset worker stopped without a result"
        ))));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
