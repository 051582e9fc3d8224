use std::io;
use std::sync::Arc;
use std::thread;

use photowall::{LayoutEngine, LayoutGeometry, LayoutOptions, LayoutResult, Photo};
use tokio::sync::mpsc;

/// A layout request for [`LayoutWorker`].
#[derive(Clone, Debug)]
pub struct LayoutJob {
    pub photos: Arc<[Photo]>,
    pub photos_version: u64,
    pub geometry: LayoutGeometry,
}

/// A finished layout, tagged with the sequence number of the job that produced it.
#[derive(Clone, Debug)]
pub struct LayoutOutput {
    pub seq: u64,
    pub photos: Arc<[Photo]>,
    pub photos_version: u64,
    pub geometry: LayoutGeometry,
    pub result: Arc<LayoutResult>,
}

type Submission = (u64, LayoutJob);

/// Runs layout passes on a dedicated thread with its own [`LayoutEngine`] and cache.
///
/// Every submitted job gets a sequence number. Only the output for the newest submission is
/// ever handed back; outputs for superseded jobs are dropped, and the worker skips queued jobs
/// that have already been superseded. Dropping the worker closes the job channel and the thread
/// exits after its current pass.
#[derive(Debug)]
pub struct LayoutWorker {
    jobs: Option<mpsc::UnboundedSender<Submission>>,
    results: mpsc::UnboundedReceiver<LayoutOutput>,
    latest_seq: u64,
    delivered_seq: u64,
    thread: Option<thread::JoinHandle<()>>,
}

impl LayoutWorker {
    pub fn spawn(options: LayoutOptions) -> io::Result<Self> {
        let (job_tx, job_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let thread = thread::Builder::new()
            .name("photowall-layout".to_string())
            .spawn(move || worker_loop(LayoutEngine::new(options), job_rx, out_tx))?;
        Ok(Self {
            jobs: Some(job_tx),
            results: out_rx,
            latest_seq: 0,
            delivered_seq: 0,
            thread: Some(thread),
        })
    }

    /// Queues `job` and returns its sequence number.
    pub fn submit(&mut self, job: LayoutJob) -> u64 {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let sent = self
            .jobs
            .as_ref()
            .is_some_and(|tx| tx.send((seq, job)).is_ok());
        if !sent {
            awarn!(seq, "LayoutWorker::submit: worker thread is gone");
        }
        seq
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Whether the newest submission has not been handed back yet.
    pub fn is_busy(&self) -> bool {
        self.delivered_seq < self.latest_seq
    }

    fn accept(&mut self, output: LayoutOutput) -> Option<LayoutOutput> {
        if output.seq != self.latest_seq {
            atrace!(
                seq = output.seq,
                latest = self.latest_seq,
                "LayoutWorker: superseded output dropped"
            );
            return None;
        }
        self.delivered_seq = output.seq;
        Some(output)
    }

    /// Returns the output of the newest submission if it is ready, without blocking.
    pub fn try_latest(&mut self) -> Option<LayoutOutput> {
        let mut found = None;
        while let Ok(output) = self.results.try_recv() {
            if let Some(output) = self.accept(output) {
                found = Some(output);
            }
        }
        found
    }

    /// Waits for the output of the newest submission.
    ///
    /// Returns `None` if it was already delivered or the worker thread is gone.
    pub async fn latest(&mut self) -> Option<LayoutOutput> {
        while self.is_busy() {
            let output = self.results.recv().await?;
            if let Some(output) = self.accept(output) {
                return Some(output);
            }
        }
        None
    }

    /// Closes the job channel and waits for the thread to exit.
    pub fn shutdown(mut self) {
        self.jobs = None;
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                awarn!("LayoutWorker::shutdown: worker thread panicked");
            }
        }
    }
}

fn worker_loop(
    mut engine: LayoutEngine,
    mut jobs: mpsc::UnboundedReceiver<Submission>,
    results: mpsc::UnboundedSender<LayoutOutput>,
) {
    while let Some(mut next) = jobs.blocking_recv() {
        // Only the newest queued job matters.
        while let Ok(newer) = jobs.try_recv() {
            next = newer;
        }
        let (seq, job) = next;
        let result = engine.layout(&job.photos, job.geometry);
        adebug!(
            seq,
            photos_version = job.photos_version,
            items = result.len(),
            "LayoutWorker: layout finished"
        );
        let output = LayoutOutput {
            seq,
            photos: job.photos,
            photos_version: job.photos_version,
            geometry: job.geometry,
            result,
        };
        if results.send(output).is_err() {
            break;
        }
    }
    atrace!("LayoutWorker: thread exiting");
}
