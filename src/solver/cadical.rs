//! Native SAT backend on top of the [CaDiCaL][cadical] solver.
//!
//! Solver objects are literals. Every AND gate is Tseitin-encoded exactly
//! once into the single incremental CaDiCaL instance and shared through a
//! gate table keyed by its (sorted, deduplicated) inputs; OR is the
//! complemented AND of complemented inputs. Queries are answered with
//! `solve_with([lit])`, so the clause database only ever grows and earlier
//! queries never constrain later ones.
//!
//! [cadical]: https://fmv.jku.at/cadical/

use std::collections::HashMap;

use log::{debug, trace};

use crate::solver::{Solver, SolverError};
use crate::types::{Lit, Var};

pub struct CadicalSolver {
    solver: cadical::Solver,
    truth: Lit,
    num_vars: u32,
    num_clauses: usize,
    num_solves: usize,
    gates: HashMap<Box<[Lit]>, Lit>,
    names: HashMap<Var, String>,
}

impl CadicalSolver {
    pub fn new() -> Self {
        let mut this = Self {
            solver: Default::default(),
            truth: Var::new(1).pos(),
            num_vars: 1,
            num_clauses: 0,
            num_solves: 0,
            gates: HashMap::new(),
            names: HashMap::new(),
        };
        let truth = this.truth;
        this.add_clause(&[truth]);
        this
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn num_clauses(&self) -> usize {
        self.num_clauses
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_solves(&self) -> usize {
        self.num_solves
    }

    /// Name given to the variable of `lit` by [`Solver::new_var`], if any.
    pub fn name_of(&self, lit: Lit) -> Option<&str> {
        self.names.get(&lit.var()).map(String::as_str)
    }

    fn fresh(&mut self) -> Var {
        self.num_vars += 1;
        Var::new(self.num_vars)
    }

    fn add_clause(&mut self, lits: &[Lit]) {
        trace!("cadical: clause {:?}", lits.iter().map(|l| l.to_dimacs()).collect::<Vec<_>>());
        self.solver.add_clause(lits.iter().map(|l| l.to_dimacs()));
        self.num_clauses += 1;
    }

    /// Conjunction with constant folding, deduplication and gate sharing.
    fn and_gate(&mut self, inputs: &[Lit]) -> Lit {
        let falsity = -self.truth;
        if inputs.contains(&falsity) {
            return falsity;
        }

        let mut lits: Vec<Lit> = inputs.iter().copied().filter(|&l| l != self.truth).collect();
        lits.sort_unstable();
        lits.dedup();
        // Complementary literals are adjacent after sorting.
        if lits.windows(2).any(|w| w[0] == -w[1]) {
            return falsity;
        }
        match lits.len() {
            0 => return self.truth,
            1 => return lits[0],
            _ => {}
        }

        let key: Box<[Lit]> = lits.into_boxed_slice();
        if let Some(&gate) = self.gates.get(&key) {
            return gate;
        }

        let gate = self.fresh().pos();
        debug!("cadical: gate {} = AND{:?}", gate, key.iter().map(|l| l.to_dimacs()).collect::<Vec<_>>());
        // gate -> l, for every input
        for &l in key.iter() {
            self.add_clause(&[-gate, l]);
        }
        // (all inputs) -> gate
        let mut clause: Vec<Lit> = key.iter().map(|&l| -l).collect();
        clause.push(gate);
        self.add_clause(&clause);

        self.gates.insert(key, gate);
        gate
    }
}

impl Default for CadicalSolver {
    fn default() -> Self {
        CadicalSolver::new()
    }
}

impl Solver for CadicalSolver {
    type Object = Lit;

    fn name(&self) -> &'static str {
        "cadical"
    }

    fn const_true(&mut self) -> Lit {
        self.truth
    }

    fn const_false(&mut self) -> Lit {
        -self.truth
    }

    fn new_var(&mut self, name: &str) -> Lit {
        let var = self.fresh();
        self.names.insert(var, name.to_string());
        var.pos()
    }

    fn not(&mut self, object: &Lit) -> Lit {
        -*object
    }

    fn and(&mut self, objects: &[Lit]) -> Lit {
        self.and_gate(objects)
    }

    fn or(&mut self, objects: &[Lit]) -> Lit {
        let negated: Vec<Lit> = objects.iter().map(|&l| -l).collect();
        -self.and_gate(&negated)
    }

    fn is_sat(&mut self, object: &Lit) -> Result<bool, SolverError> {
        if *object == self.truth {
            return Ok(true);
        }
        if *object == -self.truth {
            return Ok(false);
        }
        self.num_solves += 1;
        self.solver
            .solve_with([object.to_dimacs()])
            .ok_or(SolverError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_constants() {
        let mut s = CadicalSolver::new();
        let t = s.const_true();
        let f = s.const_false();
        assert_eq!(s.not(&t), f);
        assert_eq!(s.is_sat(&t), Ok(true));
        assert_eq!(s.is_sat(&f), Ok(false));
    }

    #[test]
    fn test_contradiction() {
        let mut s = CadicalSolver::new();
        let x = s.new_var("x0");
        let nx = s.not(&x);
        let f = s.and(&[x, nx]);
        assert_eq!(f, s.const_false());
        let g = s.or(&[x, nx]);
        assert_eq!(g, s.const_true());
    }

    #[test]
    fn test_gate_sharing() {
        let mut s = CadicalSolver::new();
        let x = s.new_var("x0");
        let y = s.new_var("x1");
        let f = s.and(&[x, y]);
        let g = s.and(&[y, x, y]);
        assert_eq!(f, g);
        assert_eq!(s.num_gates(), 1);
        assert_eq!(s.name_of(x), Some("x0"));
    }

    #[test]
    fn test_solve() {
        let mut s = CadicalSolver::new();
        let x = s.new_var("x0");
        let y = s.new_var("x1");
        let x_or_y = s.or(&[x, y]);
        let nx = s.not(&x);
        let ny = s.not(&y);
        let f = s.and(&[x_or_y, nx]);
        assert_eq!(s.is_sat(&f), Ok(true));
        let g = s.and(&[x_or_y, nx, ny]);
        assert_eq!(s.is_sat(&g), Ok(false));
        // Earlier queries do not constrain later ones.
        assert_eq!(s.is_sat(&x), Ok(true));
        assert_eq!(s.is_sat(&nx), Ok(true));
        assert_eq!(s.num_solves(), 4);
    }

    #[test]
    fn test_fresh_var_is_sat() {
        let mut s = CadicalSolver::new();
        let x = s.new_var("x0");
        assert_eq!(s.is_sat(&x), Ok(true));
        let nx = s.not(&x);
        assert_eq!(s.is_sat(&nx), Ok(true));
    }
}
