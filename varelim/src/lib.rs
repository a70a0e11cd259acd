//! Exact inference in discrete Bayesian networks by variable elimination.
//!
//! The crate is organized bottom-up:
//! - [`Variable`] and [`Factor`] are the data model,
//! - [`algebra`] holds the pure factor operations (product, restriction, marginalization and
//!   normalization),
//! - [`ordering`] computes the elimination ordering,
//! - [`BayesNet`] holds the variables and CPTs of a network,
//! - [`VariableElimination`] runs queries against a network.
//!
//! Evidence is carried by the [`Variable`] values given to a query (see
//! [`Variable::set_evidence`]), never by the network itself, hence queries with different
//! evidence can run concurrently on the same network.

pub mod algebra;
pub mod assignment;
pub mod factor;
pub mod inference;
pub mod network;
pub mod ordering;
mod variable;

pub use factor::{Assignment, Factor, FactorError};
pub use inference::{infer, Query, VariableElimination};
pub use network::{BayesNet, NetBuilder, NetError};
pub use ordering::EliminationHeuristic;
pub use variable::Variable;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InferenceError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error(transparent)]
    Factor(#[from] FactorError),
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("Evidence variable {0} has no observed value.")]
    MissingEvidence(String),
    #[error("Two different values observed for variable {0}.")]
    ConflictingEvidence(String),
}

impl InferenceError {
    pub fn is_domain_error(&self) -> bool {
        match self {
            Self::Factor(e) | Self::Net(NetError::Factor(e)) => e.is_domain_error(),
            _ => false,
        }
    }
    pub fn is_scope_mismatch(&self) -> bool {
        match self {
            Self::Factor(e) | Self::Net(NetError::Factor(e)) => e.is_scope_mismatch(),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Config {
    /// Cost function of the greedy elimination ordering.
    pub heuristic: EliminationHeuristic,
    /// Restrict the factors to the evidence in parallel.
    /// The result does not depend on this setting.
    pub parallel_restrict: bool,
}

impl Config {
    pub fn min_fill() -> Self {
        Self {
            heuristic: EliminationHeuristic::MinFill,
            parallel_restrict: false,
        }
    }
    pub fn min_weight() -> Self {
        Self {
            heuristic: EliminationHeuristic::MinWeight,
            parallel_restrict: false,
        }
    }
    pub fn with_parallel_restrict(self, parallel_restrict: bool) -> Self {
        Self {
            parallel_restrict,
            ..self
        }
    }
}
