//! Option presets shipped with the built-in registry.
//!
//! These strings are passed to the prover verbatim.

/// Folder holding `specs/` and `harnesses/`.
pub const DEFAULT_CERTORA_DIR: &str = "./formal-verification/certora";

/// Options appended to every built-in job.
pub const DEFAULT_OPTIONS: &[&str] = &["--smt_timeout 900", "--send_only"];

/// Solver tuning presets, ordered from lightest to heaviest.
pub const PROVER_ARGS_PRESETS: &[&str] = &[
    "--prover_args '-deleteSMTFile false -canonicalizeTAC false -s [z3,cvc5:nonlin,cvc4]'",
    "--prover_args '-deleteSMTFile false -canonicalizeTAC false -smt_hashingScheme PlainInjectivity -s [yices,z3,cvc5:nonlin,cvc4]'",
    // moderate path count with nonlinear arithmetic
    "--prover_args '-deleteSMTFile false -smt_hashingScheme PlainInjectivity -s [yices,z3] -canonicalizeTAC false'",
    // large graph with lightweight arithmetic
    "--prover_args '-deleteSMTFile false -smt_hashingScheme PlainInjectivity -s [yices,z3] -splitParallel true -depth 15 -dontStopAtFirstSplitTimeout true -numOfParallelSplits 5 -splitParallelInitialDepth 8 -canonicalizeTAC false'",
];
