//! Error types for formula construction and satisfiability queries.

use thiserror::Error;

use crate::types::{NodeId, NodeKind};

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the current run.
///
/// None of these are recoverable: the caller is expected to stop using
/// the session once one is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend tag not recognised by the selector.
    #[error("unexpected/incompatible expression library type `{0}`")]
    UnknownBackend(String),

    /// The expression library reported a kind/arity combination that cannot be lowered.
    #[error("malformed formula node {node}: {kind} with {arity} children")]
    MalformedNode {
        node: NodeId,
        kind: NodeKind,
        arity: usize,
    },

    /// The node does not belong to this session's expression library.
    #[error("unknown formula node {0}")]
    UnknownNode(NodeId),

    /// Storage bits outside `0..=31`.
    #[error("storage bits should be in the range 0..=31, got {0}")]
    InvalidBits(usize),

    /// The decision procedure could not answer.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Errors reported by a [`Solver`][crate::solver::Solver] backend.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum SolverError {
    /// The backend stopped without a definite answer.
    #[error("solver returned no answer")]
    Interrupted,

    /// Any other backend failure.
    #[error("solver backend error: {0}")]
    Backend(String),
}
