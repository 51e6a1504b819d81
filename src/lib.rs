//! # satexpr: hash-consed boolean formulas with memoized satisfiability
//!
//! **`satexpr`** sits between a symbolic-execution engine that builds path
//! conditions and a decision procedure that decides them. Every distinct
//! formula is lowered into solver objects exactly once, and every
//! satisfiability answer is computed at most once and then remembered.
//!
//! ## Architecture
//!
//! - An **expression library** ([`expr::ExprLib`]) builds abstract formula
//!   trees: [`expr::native::NativeExpr`] (n-ary AND/OR/NOT) or
//!   [`expr::aig::Aig`] (and-inverter graph).
//! - A **solver** ([`solver::Solver`]) builds its own objects and decides
//!   them: [`solver::cadical::CadicalSolver`] (CaDiCaL, Tseitin encoding)
//!   or [`solver::bdd::BddSolver`] (BDDs with complement edges).
//! - A **session** ([`session::Session`]) owns one of each, the formula
//!   cache of [`entry::SatObject`]s, and the variable counter.
//! - The **backend selector** ([`backend::Backend`]) picks the pair at
//!   construction time.
//!
//! ## Status transitions
//!
//! Each cache entry is in one of three states. Constants start decided,
//! everything else starts `Unknown` and moves at most once:
//!
//! ```text
//! Unknown ──is_sat──> Sat
//!    └──────is_sat──> Unsat (object replaced by the solver's constant false)
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use satexpr::backend::Backend;
//! use satexpr::types::Status;
//!
//! let mut s = Backend::from_tag("native").unwrap();
//!
//! // Path condition: (x0 | x1) & !x0 & !x1
//! let x0 = s.new_var();
//! let x1 = s.new_var();
//! let either = s.or(x0, x1);
//! let n0 = s.not(x0);
//! let n1 = s.not(x1);
//! let pc = s.and_many([either, n0, n1]);
//!
//! assert!(!s.is_sat(pc).unwrap());
//! assert_eq!(s.status(pc), Some(Status::Unsat));
//!
//! // Asking again does not call the solver.
//! assert!(!s.is_sat(pc).unwrap());
//! assert_eq!(s.stats().solver_calls, 1);
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod entry;
pub mod error;
pub mod expr;
pub mod formula;
pub mod reference;
pub mod session;
pub mod solver;
pub mod table;
pub mod types;
pub mod utils;
