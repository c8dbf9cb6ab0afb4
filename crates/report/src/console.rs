//! Console output for a run.

use std::io::Write;

use proofrun_core::RunOutcome;
use proofrun_execution::{EventHandler, JobEvent};
use tracing::warn;

use crate::block::JobReport;

/// Writes job events to the console.
///
/// `out` receives command echoes, live output, and report blocks.
/// `err` receives status URLs and each job's diagnostic trailer.
pub struct ConsoleReporter<O: Write, E: Write> {
    out: O,
    err: E,
    live: bool,
    reported: usize,
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    /// Create a reporter writing to `out` and `err`.
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            live: true,
            reported: 0,
        }
    }

    /// Enable or disable live pass-through of job output.
    pub fn with_live_output(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Number of jobs reported so far.
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Consume the reporter, returning its writers.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    /// Print the report block and diagnostic trailer for a finished job.
    pub fn report(&mut self, outcome: &RunOutcome) -> std::io::Result<()> {
        let report = JobReport::from_outcome(outcome);
        if report.results_url.is_none() {
            warn!(spec = %report.spec, contract = %report.contract, "no results URL in prover output");
        }

        writeln!(self.out)?;
        self.out.write_all(report.render().as_bytes())?;
        writeln!(self.out)?;
        self.out.flush()?;

        writeln!(self.err, "+ {}", outcome.command_line)?;
        self.err.write_all(&outcome.output)?;
        if let Some(error) = &outcome.spawn_error {
            writeln!(self.err, "{}", error)?;
        }
        self.err.flush()?;

        self.reported += 1;
        Ok(())
    }
}

impl<O: Write, E: Write> EventHandler for ConsoleReporter<O, E> {
    fn handle(&mut self, event: &JobEvent) -> std::io::Result<()> {
        match event {
            JobEvent::Started { command_line, .. } => {
                writeln!(self.out, "+ {}", command_line)?;
                self.out.flush()
            }
            JobEvent::Output { chunk, .. } if self.live => {
                self.out.write_all(chunk)?;
                self.out.flush()
            }
            JobEvent::Output { .. } => Ok(()),
            JobEvent::StatusUrl { job, url } => {
                writeln!(self.err, "[{}] {}", job.spec, url)?;
                self.err.flush()
            }
            JobEvent::Finished(outcome) => self.report(outcome),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proofrun_core::{JobDescriptor, JobId};

    fn reporter() -> ConsoleReporter<Vec<u8>, Vec<u8>> {
        ConsoleReporter::new(Vec::new(), Vec::new())
    }

    fn finished(exit_code: i32, output: &str) -> JobEvent {
        JobEvent::Finished(RunOutcome {
            job: JobDescriptor::new("FeeFlowController", "FeeFlowControllerHarness"),
            command_line: "certoraRun x.sol --verify C:S".to_string(),
            exit_code: Some(exit_code),
            signal: None,
            early_status_url: None,
            output: output.as_bytes().to_vec(),
            spawn_error: None,
        })
    }

    fn job() -> JobId {
        JobId::new("FeeFlowController", "FeeFlowControllerHarness")
    }

    #[test]
    fn test_successful_job_report() {
        let mut reporter = reporter();
        reporter
            .handle(&finished(0, "ok https://prover.certora.com/output/7/42?anonymousKey=k\n"))
            .unwrap();

        assert_eq!(reporter.reported(), 1);

        let (out, err) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Success: :heavy_check_mark:\n"));
        assert!(out.contains("Status: https://prover.certora.com/jobStatus/7/42?anonymousKey=k\n"));
        assert!(!out.contains("error"));

        let err = String::from_utf8(err).unwrap();
        assert_eq!(
            err,
            "+ certoraRun x.sol --verify C:S\nok https://prover.certora.com/output/7/42?anonymousKey=k\n"
        );
    }

    #[test]
    fn test_failed_job_report() {
        let mut reporter = reporter();
        reporter.handle(&finished(0, "")).unwrap();
        reporter.handle(&finished(1, "boom\n")).unwrap();

        assert_eq!(reporter.reported(), 2);
        let (out, err) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("Success: :heavy_check_mark:\n").count(), 1);
        assert_eq!(out.matches("Success: ???\n").count(), 1);
        assert!(out.contains("Status: error\n"));
        assert!(String::from_utf8(err).unwrap().ends_with("boom\n"));
    }

    #[test]
    fn test_status_url_and_live_output() {
        let mut reporter = reporter();
        reporter
            .handle(&JobEvent::Started {
                job: job(),
                command_line: "certoraRun a.sol".to_string(),
            })
            .unwrap();
        reporter
            .handle(&JobEvent::Output {
                job: job(),
                chunk: b"compiling\n".to_vec(),
            })
            .unwrap();
        reporter
            .handle(&JobEvent::StatusUrl {
                job: job(),
                url: "https://prover.certora.com/output/7/42/".to_string(),
            })
            .unwrap();

        let (out, err) = reporter.into_inner();
        assert_eq!(String::from_utf8(out).unwrap(), "+ certoraRun a.sol\ncompiling\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "[FeeFlowController] https://prover.certora.com/output/7/42/\n"
        );
    }

    #[test]
    fn test_quiet_mode_skips_live_output() {
        let mut reporter = reporter().with_live_output(false);
        reporter
            .handle(&JobEvent::Output {
                job: job(),
                chunk: b"noise\n".to_vec(),
            })
            .unwrap();
        let (out, _) = reporter.into_inner();
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    mod scenarios {
        use super::*;
        use proofrun_core::SpecRegistry;
        use proofrun_execution::{ExecutionEngine, ProverRunner, SelectionRequest};
        use proofrun_tools::ProverConfig;
        use std::io::Write as _;
        use std::sync::Arc;

        /// Fake prover that fails for specs named `Broken*`.
        fn fake_prover(dir: &tempfile::TempDir) -> String {
            let path = dir.path().join("certoraRun");
            let mut file = std::fs::File::create(&path).unwrap();
            write!(
                file,
                r#"#!/bin/sh
case "$*" in
  *Broken*) echo "CRITICAL: spec failed to compile" >&2; exit 1 ;;
esac
echo "java -DjobId=42 -DuserId=7 -jar prover.jar" >&2
sleep 0.05
echo "java -DjobId=43 -DuserId=8"
echo "Follow your job at https://prover.certora.com/output/7/42?anonymousKey=abc"
"#
            )
            .unwrap();
            drop(file);
            format!("sh {}", path.display())
        }

        fn registry(specs: &[(&str, &str)]) -> SpecRegistry {
            let mut registry = SpecRegistry::new();
            for (spec, contract) in specs {
                registry
                    .register(JobDescriptor::new(*spec, *contract).with_file("harness.sol"))
                    .unwrap();
            }
            registry
        }

        #[tokio::test]
        async fn test_all_jobs_pass() {
            let dir = tempfile::tempdir().unwrap();
            let runner = Arc::new(ProverRunner::new(
                ProverConfig::new().with_program(fake_prover(&dir)),
            ));
            let engine = ExecutionEngine::new(runner);
            let mut reporter = reporter();

            let registry = registry(&[("FeeFlowController", "FeeFlowControllerHarness")]);
            let result = engine
                .run(&registry, &SelectionRequest::all(), &mut reporter)
                .await;

            assert_eq!(result.exit_code(), 0);
            let (out, err) = reporter.into_inner();
            let out = String::from_utf8(out).unwrap();
            assert!(out.contains("Spec: FeeFlowController\nContract: FeeFlowControllerHarness\n"));
            assert!(out.contains("Success: :heavy_check_mark:\n"));
            assert!(out.contains("Status: https://prover.certora.com/jobStatus/7/42?anonymousKey=abc\n"));
            assert!(out.contains(
                "Debug: https://prover.certora.com/output/7/42/FinalResults.html?anonymousKey=abc\n"
            ));

            let err = String::from_utf8(err).unwrap();
            assert_eq!(
                err.matches("[FeeFlowController] https://prover.certora.com/output/").count(),
                1
            );
            assert!(err.contains("[FeeFlowController] https://prover.certora.com/output/7/42/\n"));
        }

        #[tokio::test]
        async fn test_failed_job_does_not_affect_others() {
            let dir = tempfile::tempdir().unwrap();
            let runner = Arc::new(ProverRunner::new(
                ProverConfig::new().with_program(fake_prover(&dir)),
            ));
            let engine = ExecutionEngine::new(runner);
            let mut reporter = reporter();

            let registry = registry(&[
                ("Vault", "VaultHarness"),
                ("Broken", "BrokenHarness"),
                ("Oracle", "OracleHarness"),
            ]);
            let result = engine
                .run(&registry, &SelectionRequest::all(), &mut reporter)
                .await;

            assert_eq!(result.exit_code(), 1);
            assert_eq!(reporter.reported(), 3);

            let (out, err) = reporter.into_inner();
            let out = String::from_utf8(out).unwrap();
            assert_eq!(out.matches("Success: :heavy_check_mark:").count(), 2);
            assert_eq!(out.matches("Success: ???").count(), 1);
            assert!(String::from_utf8(err).unwrap().contains("CRITICAL: spec failed to compile"));
        }

        #[tokio::test]
        async fn test_unknown_spec_runs_nothing() {
            let dir = tempfile::tempdir().unwrap();
            let runner = Arc::new(ProverRunner::new(
                ProverConfig::new().with_program(fake_prover(&dir)),
            ));
            let engine = ExecutionEngine::new(runner);
            let mut reporter = reporter();

            let registry = registry(&[("FeeFlowController", "FeeFlowControllerHarness")]);
            let result = engine
                .run(&registry, &SelectionRequest::tokens(["NoSuchSpec"]), &mut reporter)
                .await;

            assert_eq!(result.exit_code(), 1);
            assert_eq!(reporter.reported(), 0);
            let (out, err) = reporter.into_inner();
            assert!(out.is_empty());
            assert!(err.is_empty());
        }
    }
}
