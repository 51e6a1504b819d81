//! Decision procedures.
//!
//! A [`Solver`] builds its own representation of boolean expressions
//! (literals, BDD nodes, ...) and answers single satisfiability queries
//! over them. Objects from one solver instance are meaningless to another.
//!
//! - [`cadical::CadicalSolver`]: Tseitin encoding into the CaDiCaL SAT solver.
//! - [`bdd::BddSolver`]: a BDD manager with complement edges.

pub mod bdd;
pub mod cadical;

use std::fmt::Debug;

pub use crate::error::SolverError;

pub trait Solver {
    type Object: Clone + Eq + Debug;

    /// Short name, used in diagnostics.
    fn name(&self) -> &'static str;

    fn const_true(&mut self) -> Self::Object;
    fn const_false(&mut self) -> Self::Object;
    fn new_var(&mut self, name: &str) -> Self::Object;
    fn not(&mut self, object: &Self::Object) -> Self::Object;
    fn and(&mut self, objects: &[Self::Object]) -> Self::Object;
    fn or(&mut self, objects: &[Self::Object]) -> Self::Object;

    /// Decide whether `object` has a satisfying assignment.
    fn is_sat(&mut self, object: &Self::Object) -> Result<bool, SolverError>;
}
