//! Report block for one finished job.

use std::fmt::Write as _;
use std::sync::OnceLock;

use proofrun_core::RunOutcome;
use regex::Regex;

/// Glyph shown for a passing job.
pub const SUCCESS_GLYPH: &str = ":heavy_check_mark:";

/// Glyph shown for a failing job.
pub const FAILURE_GLYPH: &str = "???";

/// Width of the `=` divider lines.
pub const DIVIDER_WIDTH: usize = 80;

const MISSING_LINK: &str = "error";

fn results_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https://prover\.certora\.com/output/\S*").expect("valid results url pattern")
    })
}

/// First prover results URL in `text`.
pub fn find_results_url(text: &str) -> Option<&str> {
    results_url_regex().find(text).map(|m| m.as_str())
}

/// Summary of one job, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    /// Spec name
    pub spec: String,
    /// Contract name
    pub contract: String,
    /// Exit code 0 and no signal
    pub success: bool,
    /// Results URL found in the full output
    pub results_url: Option<String>,
}

impl JobReport {
    /// Build the report for a finished job.
    ///
    /// The results URL is searched in the complete buffered output, apart
    /// from whatever the live watcher saw.
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        Self {
            spec: outcome.job.spec.clone(),
            contract: outcome.job.contract.clone(),
            success: outcome.success(),
            results_url: find_results_url(&outcome.output_text()).map(str::to_string),
        }
    }

    /// Job status page.
    pub fn status_link(&self) -> Option<String> {
        self.results_url
            .as_ref()
            .map(|url| url.replacen("/output/", "/jobStatus/", 1))
    }

    /// Final results page.
    pub fn debug_link(&self) -> Option<String> {
        self.results_url
            .as_ref()
            .map(|url| url.replacen("?anonymousKey=", "/FinalResults.html?anonymousKey=", 1))
    }

    /// The report block, divider to divider, each line newline terminated.
    pub fn render(&self) -> String {
        let divider = "=".repeat(DIVIDER_WIDTH);
        let glyph = if self.success { SUCCESS_GLYPH } else { FAILURE_GLYPH };

        let mut block = String::new();
        let _ = writeln!(block, "{}", divider);
        let _ = writeln!(block, "Spec: {}", self.spec);
        let _ = writeln!(block, "Contract: {}", self.contract);
        let _ = writeln!(block, "Success: {}", glyph);
        let _ = writeln!(block, "Status: {}", self.status_link().as_deref().unwrap_or(MISSING_LINK));
        let _ = writeln!(block, "Debug: {}", self.debug_link().as_deref().unwrap_or(MISSING_LINK));
        let _ = writeln!(block, "{}", divider);
        block
    }
}
