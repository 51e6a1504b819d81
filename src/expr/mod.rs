//! Expression libraries: builders and inspectors of abstract formula trees.
//!
//! An expression library owns its nodes and hands out [`NodeId`] handles.
//! It knows nothing about satisfiability; the
//! [`Session`][crate::session::Session] lowers its nodes into
//! [`Solver`][crate::solver::Solver] objects.
//!
//! Two implementations are provided:
//!
//! - [`native::NativeExpr`]: n-ary AND/OR/NOT trees, hash-consed on their exact structure.
//! - [`aig::Aig`]: an and-inverter graph with structural hashing, used by the fraiging backend.

pub mod aig;
pub mod native;
pub mod signal;

use crate::types::{NodeId, NodeKind, Status};

pub trait ExprLib {
    /// Short name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Check that `node` was produced by this library.
    fn contains(&self, node: NodeId) -> bool;

    /// Kind of the node.
    fn classify(&self, node: NodeId) -> NodeKind;

    /// Ordered children of the node (empty for constants and variables).
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Label of a variable node.
    fn label(&self, node: NodeId) -> String;

    fn mk_true(&mut self) -> NodeId;
    fn mk_false(&mut self) -> NodeId;
    fn mk_var(&mut self, name: &str) -> NodeId;
    fn mk_not(&mut self, node: NodeId) -> NodeId;
    /// Conjunction. An empty slice yields the constant true.
    fn mk_and(&mut self, nodes: &[NodeId]) -> NodeId;
    /// Disjunction. An empty slice yields the constant false.
    fn mk_or(&mut self, nodes: &[NodeId]) -> NodeId;

    /// Structural equality of two nodes.
    fn structural_eq(&self, a: NodeId, b: NodeId) -> bool;

    /// Hash consistent with [`structural_eq`][ExprLib::structural_eq].
    fn structural_hash(&self, node: NodeId) -> u64;

    /// Human-readable rendering of the node.
    fn print(&self, node: NodeId) -> String;

    /// Incomplete satisfiability check bounded by `budget`.
    ///
    /// May only answer `Sat`/`Unsat` when that answer is certain;
    /// `Unknown` means the budget ran out.
    fn check_bounded(&mut self, _node: NodeId, _budget: u32) -> Status {
        Status::Unknown
    }
}
