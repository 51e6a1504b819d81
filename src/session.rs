//! Formula sessions: construction, hash-consed lowering, and cached decisions.
//!
//! A [`Session`] pairs one [`ExprLib`] with one [`Solver`] and owns all the
//! state that connects them:
//!
//! - the **formula cache**: one [`SatObject`] per structurally distinct
//!   formula-tree node, created on first need and never removed;
//! - the **pre-check cache** of the bounded (fraiging) check;
//! - the counter naming fresh variables `x0, x1, ...`.
//!
//! Building formulas ([`Session::and`], [`Session::new_var`], ...) only
//! touches the expression library. [`Session::build`] lowers a formula into
//! solver objects bottom-up, reusing the entry of every sub-formula that was
//! lowered before. [`Session::is_sat`] then calls the solver at most once per
//! entry and remembers the answer:
//!
//! ```
//! use satexpr::config::Config;
//! use satexpr::session::Session;
//!
//! let mut s = Session::native(&Config::default()).unwrap();
//! let v1 = s.new_var();
//! let not_v1 = s.not(v1);
//! let f = s.and(v1, not_v1);
//! assert!(!s.is_sat(f).unwrap());
//! assert!(!s.is_sat(f).unwrap());
//! assert_eq!(s.stats().solver_calls, 1);
//! ```
//!
//! A session is single-threaded: every method takes `&mut self`, so the
//! check-then-insert of [`Session::build`] and the check-then-resolve of
//! [`Session::is_sat`] cannot interleave. Wrap it in a `Mutex` to share it.

use std::collections::HashMap;

use log::{debug, info, log_enabled, trace, Level};

use crate::config::Config;
use crate::entry::{EntryId, SatObject};
use crate::error::{Error, Result};
use crate::expr::aig::Aig;
use crate::expr::native::NativeExpr;
use crate::expr::ExprLib;
use crate::formula::Formula;
use crate::solver::bdd::BddSolver;
use crate::solver::cadical::CadicalSolver;
use crate::solver::Solver;
use crate::types::{NodeId, NodeKind, Status};

/// Counters of a session's cache activity.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Stats {
    /// `build` requests answered from the formula cache.
    pub hits: usize,
    /// Entries created.
    pub misses: usize,
    /// Real solver invocations.
    pub solver_calls: usize,
    /// Bounded checks run (not answered from the pre-check cache).
    pub precheck_calls: usize,
    /// Queries decided by the bounded check instead of the solver.
    pub precheck_hits: usize,
}

/// Map from formula-tree nodes to values, keyed by the expression
/// library's structural hash and resolved with its structural equality.
#[derive(Debug)]
struct NodeIndex<V> {
    buckets: HashMap<u64, Vec<(NodeId, V)>>,
}

impl<V: Copy> NodeIndex<V> {
    fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    fn get<E: ExprLib>(&self, exprs: &E, node: NodeId) -> Option<V> {
        self.buckets
            .get(&exprs.structural_hash(node))?
            .iter()
            .find(|(n, _)| exprs.structural_eq(*n, node))
            .map(|&(_, v)| v)
    }

    fn insert<E: ExprLib>(&mut self, exprs: &E, node: NodeId, value: V) {
        self.buckets
            .entry(exprs.structural_hash(node))
            .or_default()
            .push((node, value));
    }
}

pub struct Session<E: ExprLib, S: Solver> {
    exprs: E,
    solver: S,
    index: NodeIndex<EntryId>,
    entries: Vec<SatObject<S::Object>>,
    prechecked: NodeIndex<Status>,
    num_vars: u64,
    config: Config,
    stats: Stats,
}

impl Session<NativeExpr, CadicalSolver> {
    /// Native expression library over the CaDiCaL backend.
    pub fn native(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Session::new(
            NativeExpr::new(config.storage_bits),
            CadicalSolver::new(),
            config.clone(),
        ))
    }
}

impl Session<Aig, BddSolver> {
    /// And-inverter graph over the BDD backend.
    pub fn fraig(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Session::new(
            Aig::new(config.storage_bits, config.seed),
            BddSolver::new(config.storage_bits, config.cache_bits),
            config.clone(),
        ))
    }
}

impl<E: ExprLib, S: Solver> Session<E, S> {
    pub fn new(exprs: E, solver: S, config: Config) -> Self {
        info!(
            "new session: expressions={}, solver={}",
            exprs.name(),
            solver.name()
        );
        Self {
            exprs,
            solver,
            index: NodeIndex::new(),
            entries: Vec::new(),
            prechecked: NodeIndex::new(),
            num_vars: 0,
            config,
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn exprs(&self) -> &E {
        &self.exprs
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Number of variables issued by [`Session::new_var`].
    pub fn num_vars(&self) -> u64 {
        self.num_vars
    }

    /// Number of formula-cache entries.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }
}

// Boolean algebra
impl<E: ExprLib, S: Solver> Session<E, S> {
    pub fn const_true(&mut self) -> Formula {
        self.exprs.mk_true().into()
    }

    pub fn const_false(&mut self) -> Formula {
        self.exprs.mk_false().into()
    }

    /// A fresh variable, named after the session's variable counter.
    pub fn new_var(&mut self) -> Formula {
        let name = format!("x{}", self.num_vars);
        self.num_vars += 1;
        self.exprs.mk_var(&name).into()
    }

    pub fn not(&mut self, f: Formula) -> Formula {
        self.exprs.mk_not(f.node()).into()
    }

    pub fn and(&mut self, left: Formula, right: Formula) -> Formula {
        self.exprs.mk_and(&[left.node(), right.node()]).into()
    }

    pub fn or(&mut self, left: Formula, right: Formula) -> Formula {
        self.exprs.mk_or(&[left.node(), right.node()]).into()
    }

    /// N-ary conjunction; the empty conjunction is true.
    pub fn and_many(&mut self, fs: impl IntoIterator<Item = Formula>) -> Formula {
        let nodes: Vec<NodeId> = fs.into_iter().map(Formula::node).collect();
        self.exprs.mk_and(&nodes).into()
    }

    /// N-ary disjunction; the empty disjunction is false.
    pub fn or_many(&mut self, fs: impl IntoIterator<Item = Formula>) -> Formula {
        let nodes: Vec<NodeId> = fs.into_iter().map(Formula::node).collect();
        self.exprs.mk_or(&nodes).into()
    }

    /// Structural equality, as decided by the expression library.
    pub fn formulas_equal(&self, a: Formula, b: Formula) -> bool {
        self.exprs.structural_eq(a.node(), b.node())
    }

    /// Structural hash, as computed by the expression library.
    pub fn formula_hash(&self, f: Formula) -> u64 {
        self.exprs.structural_hash(f.node())
    }

    /// Human-readable form of the formula.
    pub fn display(&self, f: Formula) -> String {
        self.exprs.print(f.node())
    }
}

// Hash-consing builder
impl<E: ExprLib, S: Solver> Session<E, S> {
    fn lookup(&self, node: NodeId) -> Option<EntryId> {
        self.index.get(&self.exprs, node)
    }

    /// The entry behind `id`, or `None` if this session has no entry with that index.
    pub fn entry(&self, id: EntryId) -> Option<&SatObject<S::Object>> {
        self.entries.get(id.index())
    }

    /// The entry of `f`, if it was already built.
    pub fn entry_of(&self, f: Formula) -> Option<&SatObject<S::Object>> {
        self.lookup(f.node()).and_then(|id| self.entry(id))
    }

    /// Current status of `f`, or `None` if it was never built.
    pub fn status(&self, f: Formula) -> Option<Status> {
        self.entry_of(f).map(SatObject::status)
    }

    /// Lower `f` into solver objects and return its cache entry.
    ///
    /// Sub-formulas are lowered first (post-order); every node that already
    /// has an entry is reused as is. Requests for structurally equal
    /// formulas always return the same entry.
    pub fn build(&mut self, f: Formula) -> Result<EntryId> {
        let root = f.node();
        if !self.exprs.contains(root) {
            return Err(Error::UnknownNode(root));
        }
        if let Some(id) = self.lookup(root) {
            self.stats.hits += 1;
            trace!("build({}) -> {} (cached)", root, id);
            return Ok(id);
        }

        // Explicit stack: path conditions can be very deep chains.
        let mut stack = vec![(root, false)];
        while let Some((node, expanded)) = stack.pop() {
            if self.lookup(node).is_some() {
                continue;
            }

            let kind = self.exprs.classify(node);
            let children = self.exprs.children(node);

            if !expanded {
                if !kind.accepts_arity(children.len()) {
                    return Err(Error::MalformedNode {
                        node,
                        kind,
                        arity: children.len(),
                    });
                }
                stack.push((node, true));
                for &child in children.iter().rev() {
                    if !self.exprs.contains(child) {
                        return Err(Error::UnknownNode(child));
                    }
                    if self.lookup(child).is_none() {
                        stack.push((child, false));
                    }
                }
                continue;
            }

            let mut objects = Vec::with_capacity(children.len());
            for &child in &children {
                let id = self.lookup(child).ok_or(Error::UnknownNode(child))?;
                objects.push(self.entries[id.index()].object().clone());
            }
            let entry = self.lower(node, kind, &objects);

            let id = EntryId::new(self.entries.len());
            debug!("build({}): new entry {} [{}, {}]", node, id, kind, entry.status());
            self.entries.push(entry);
            self.index.insert(&self.exprs, node, id);
            self.stats.misses += 1;
        }

        self.lookup(root).ok_or(Error::UnknownNode(root))
    }

    fn lower(&mut self, node: NodeId, kind: NodeKind, children: &[S::Object]) -> SatObject<S::Object> {
        match kind {
            NodeKind::True => SatObject::new(self.solver.const_true(), Status::Sat),
            NodeKind::False => SatObject::new(self.solver.const_false(), Status::Unsat),
            NodeKind::Variable => {
                let label = self.exprs.label(node);
                SatObject::new(self.solver.new_var(&label), Status::Unknown)
            }
            NodeKind::Not => SatObject::new(self.solver.not(&children[0]), Status::Unknown),
            NodeKind::And => SatObject::new(self.solver.and(children), Status::Unknown),
            NodeKind::Or => SatObject::new(self.solver.or(children), Status::Unknown),
        }
    }
}

// Satisfiability oracle
impl<E: ExprLib, S: Solver> Session<E, S> {
    /// Decide whether `f` is satisfiable.
    ///
    /// Decided entries answer without touching the solver. Otherwise the
    /// solver is called once and the answer is stored in the entry; on
    /// `Unsat` the entry's object becomes the solver's constant false.
    pub fn is_sat(&mut self, f: Formula) -> Result<bool> {
        let id = self.build(f)?;
        if let Some(sat) = self.entries[id.index()].status().as_bool() {
            return Ok(sat);
        }

        if self.config.fraig_precheck {
            if let Some(sat) = self.precheck(f.node()).as_bool() {
                self.stats.precheck_hits += 1;
                self.resolve(id, sat);
                return Ok(sat);
            }
        }

        let sat = self.solver.is_sat(self.entries[id.index()].object())?;
        self.stats.solver_calls += 1;
        if self.config.verbosity > 4 && log_enabled!(target: "satexpr::oracle", Level::Trace) {
            trace!(
                target: "satexpr::oracle",
                "\t\tSAT ? [ {} ] :\t{}",
                self.exprs.print(f.node()),
                sat
            );
        }
        self.resolve(id, sat);
        Ok(sat)
    }

    fn resolve(&mut self, id: EntryId, sat: bool) {
        let falsity = self.solver.const_false();
        self.entries[id.index()].resolve(sat, falsity);
    }

    /// Bounded check through the pre-check cache.
    fn precheck(&mut self, node: NodeId) -> Status {
        if let Some(status) = self.prechecked.get(&self.exprs, node) {
            return status;
        }
        let status = self.exprs.check_bounded(node, self.config.fraig_patterns);
        self.stats.precheck_calls += 1;
        debug!("precheck({}) = {}", node, status);
        self.prechecked.insert(&self.exprs, node, status);
        status
    }
}
