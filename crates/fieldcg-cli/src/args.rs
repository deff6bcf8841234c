//! Command-line argument shape. A flat set of flags, not a
//! subcommand tree: `fieldcg` always does the one thing (analyze the given
//! paths and print a call graph), so there's no `Command` enum to match on.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fieldcg::config::{AnalyzerType, Strategy};

#[derive(Debug, Clone, Parser)]
#[command(name = "fieldcg", version, author, about = "Approximate field-based call-graph analyzer for JavaScript")]
pub struct CliArgs {
    /// Files or directories to analyze. Directories are walked recursively
    /// for `.js`/`.jsx`/`.mjs`/`.cjs`/`.vue` files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Inter-procedural propagation strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::OneShot)]
    pub strategy: StrategyArg,

    /// Ordered `+pattern`/`-pattern` regex filters applied to resolved file
    /// paths; the last matching rule wins. May be repeated.
    #[arg(long = "filter", value_name = "±PATTERN")]
    pub filter: Vec<String>,

    /// Write the call graph here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Emit the raw `caller -> callee` arrow-chain text format (`acg`
    /// analyzer) instead of JSON. Only meaningful with `--analyzer-type acg`.
    #[arg(long)]
    pub fg: bool,

    /// Count callback arguments toward a function's label even when the
    /// call also resolves to a named target.
    #[arg(long = "count-cb")]
    pub count_cb: bool,

    /// Require a successful parse of every input file; otherwise unparsable
    /// files are skipped with a diagnostic rather than aborting the run.
    #[arg(long = "req-js")]
    pub req_js: bool,

    /// Which edge-extraction projection to run.
    #[arg(long = "analyzer-type", value_enum, default_value_t = AnalyzerTypeArg::Static)]
    pub analyzer_type: AnalyzerTypeArg,

    /// Print a per-stage timing table to stderr.
    #[arg(long)]
    pub time: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    None,
    #[value(name = "oneshot")]
    OneShot,
    Demand,
    Full,
}

impl From<StrategyArg> for Strategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::None => Self::None,
            StrategyArg::OneShot => Self::OneShot,
            StrategyArg::Demand | StrategyArg::Full => Self::Demand,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalyzerTypeArg {
    Static,
    #[value(name = "nativecalls")]
    NativeCalls,
    Acg,
}

impl From<AnalyzerTypeArg> for AnalyzerType {
    fn from(value: AnalyzerTypeArg) -> Self {
        match value {
            AnalyzerTypeArg::Static => Self::Static,
            AnalyzerTypeArg::NativeCalls => Self::NativeCalls,
            AnalyzerTypeArg::Acg => Self::Acg,
        }
    }
}
