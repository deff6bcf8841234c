//! Analysis configuration: the inter-procedural strategy and the
//! edge-extraction projection. File discovery, filtering, and output
//! plumbing are external-collaborator concerns (`fieldcg-cli`); this module
//! only covers the knobs the core engine itself interprets.

use std::fmt;
use std::str::FromStr;

/// Inter-procedural propagation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    None,
    #[default]
    OneShot,
    Demand,
}

impl FromStr for Strategy {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "ONESHOT" | "ONE-SHOT" | "ONE_SHOT" => Ok(Self::OneShot),
            "DEMAND" => Ok(Self::Demand),
            // FULL aliases to DEMAND, with a warning left for the caller to
            // surface (the core has no logger to warn into here).
            "FULL" => Ok(Self::Demand),
            other => Err(UnknownStrategyError(other.to_owned())),
        }
    }
}

/// Configuration-time failure: the one error in the crate that is fatal
/// rather than accumulated as a [`crate::diagnostics::Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStrategyError(String);

impl fmt::Display for UnknownStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy \"{}\" (expected NONE, ONESHOT, DEMAND, or FULL)", self.0)
    }
}

impl std::error::Error for UnknownStrategyError {}

/// Edge-extraction projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalyzerType {
    #[default]
    Static,
    NativeCalls,
    Acg,
}

impl FromStr for AnalyzerType {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "nativecalls" => Ok(Self::NativeCalls),
            "acg" => Ok(Self::Acg),
            other => Err(UnknownStrategyError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    pub strategy: Strategy,
    pub analyzer_type: AnalyzerType,
    pub count_callbacks: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            analyzer_type: AnalyzerType::default(),
            count_callbacks: false,
        }
    }
}
