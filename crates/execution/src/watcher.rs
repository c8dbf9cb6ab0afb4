//! One-shot scanner for the prover's tracking identifiers.
//!
//! The prover prints `-DjobId=<id>` and `-DuserId=<id>` early in its run.
//! As soon as both are seen the live status URL can be shown, long before
//! the job finishes.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Base of every prover output URL.
pub const PROVER_OUTPUT_BASE: &str = "https://prover.certora.com/output";

/// Scanner state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchState {
    /// No complete id pair seen yet
    Watching,
    /// Pair found; URL not yet acknowledged
    Found(String),
    /// Done; further input is ignored
    Detached,
}

fn define_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-D([^\s=]+)=([^\s=]+)").expect("valid define pattern"))
}

/// All `-D<key>=<value>` pairs in `text`; later keys override earlier ones.
pub fn scan_defines(text: &str) -> HashMap<String, String> {
    define_regex()
        .captures_iter(text)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Status URL for a job/user pair.
pub fn status_url(user_id: &str, job_id: &str) -> String {
    format!("{}/{}/{}/", PROVER_OUTPUT_BASE, user_id, job_id)
}

/// Status URL from the first text holding both `jobId` and `userId`.
pub fn extract_status_url(text: &str) -> Option<String> {
    let defines = scan_defines(text);
    match (defines.get("jobId"), defines.get("userId")) {
        (Some(job_id), Some(user_id)) => Some(status_url(user_id, job_id)),
        _ => None,
    }
}

/// Incremental watcher over one job's output stream.
///
/// Complete lines are scanned once and their defines kept; only the
/// unterminated tail is rescanned on the next chunk.
#[derive(Debug)]
pub struct OutputWatcher {
    state: WatchState,
    defines: HashMap<String, String>,
    partial: Vec<u8>,
}

impl OutputWatcher {
    /// Create a watcher in the `Watching` state.
    pub fn new() -> Self {
        Self {
            state: WatchState::Watching,
            defines: HashMap::new(),
            partial: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Feed the next chunk.
    ///
    /// Returns the status URL the first time a complete id pair is present in
    /// the text seen so far, then never again.
    pub fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        if self.state != WatchState::Watching {
            return None;
        }

        self.partial.extend_from_slice(chunk);
        if let Some(end) = self.partial.iter().rposition(|&b| b == b'\n') {
            let lines: Vec<u8> = self.partial.drain(..=end).collect();
            self.defines.extend(scan_defines(&String::from_utf8_lossy(&lines)));
        }

        // the tail may already hold a usable pair before its newline arrives
        let tail = scan_defines(&String::from_utf8_lossy(&self.partial));
        let lookup = |key: &str| tail.get(key).or_else(|| self.defines.get(key));

        let url = match (lookup("jobId"), lookup("userId")) {
            (Some(job_id), Some(user_id)) => status_url(user_id, job_id),
            _ => return None,
        };
        self.state = WatchState::Found(url.clone());
        Some(url)
    }

    /// Stop watching and release buffered state.
    pub fn detach(&mut self) {
        self.state = WatchState::Detached;
        self.defines = HashMap::new();
        self.partial = Vec::new();
    }
}

impl Default for OutputWatcher {
    fn default() -> Self {
        Self::new()
    }
}
