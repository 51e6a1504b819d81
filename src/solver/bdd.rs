//! BDD decision procedure.
//!
//! A reduced ordered BDD with complement edges: the only terminal is
//! node 1 (`one`), and `zero` is its complement. Canonicity is kept by
//! never storing a complemented high edge. Variables are ordered by
//! creation, the most recently created variable being the topmost: a path
//! condition extended with a fresh variable gets a new root node in
//! constant time.
//!
//! All boolean operations go through [`BddSolver::apply_ite`], whose
//! results are memoized in a lossy computed table. The ITE recursion runs
//! on an explicit work stack, since its depth is the number of variables.
//! Since the representation is canonical, satisfiability is a pointer
//! comparison against `zero`.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::cache::Cache;
use crate::reference::Ref;
use crate::solver::{Solver, SolverError};
use crate::table::Table;
use crate::utils::{pairing3, MyHash};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct Node {
    variable: u32,
    low: Ref,
    high: Ref,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            variable: 0,
            low: Ref::positive(0),
            high: Ref::positive(0),
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(self.variable as u64, self.low.unsigned(), self.high.unsigned())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IteKey(Ref, Ref, Ref);

impl MyHash for IteKey {
    fn hash(&self) -> u64 {
        pairing3(self.0.unsigned(), self.1.unsigned(), self.2.unsigned())
    }
}

enum IteTask {
    Call(Ref, Ref, Ref),
    Join { v: u32, key: IteKey, negate: bool },
}

enum IteStep {
    Done(Ref),
    Split {
        v: u32,
        key: IteKey,
        negate: bool,
        high: (Ref, Ref, Ref),
        low: (Ref, Ref, Ref),
    },
}

pub struct BddSolver {
    storage: Table<Node>,
    cache: Cache<IteKey, Ref>,
    num_vars: u32,
    names: HashMap<u32, String>,
    pub zero: Ref,
    pub one: Ref,
}

impl BddSolver {
    pub fn new(storage_bits: usize, cache_bits: usize) -> Self {
        let mut storage = Table::new(storage_bits);

        // Allocate the terminal node:
        let (one, _) = storage.put(Node {
            variable: 0,
            low: Ref::positive(1),
            high: Ref::positive(1),
        });
        assert_eq!(one, 1, "terminal node must be (1)");
        let one = Ref::positive(one as u32);

        Self {
            storage,
            cache: Cache::new(cache_bits),
            num_vars: 0,
            names: HashMap::new(),
            zero: -one,
            one,
        }
    }

    pub fn cache(&self) -> &Cache<IteKey, Ref> {
        &self.cache
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of nodes ever allocated, terminal included.
    pub fn num_nodes(&self) -> usize {
        self.storage.len()
    }

    pub fn name_of(&self, variable: u32) -> Option<&str> {
        self.names.get(&variable).map(String::as_str)
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.index() == 1
    }

    /// Variable of the node, 0 for the terminal.
    pub fn variable(&self, node: Ref) -> u32 {
        self.storage[node.index() as usize].variable
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.storage[node.index() as usize].low;
        if node.is_negated() {
            -low
        } else {
            low
        }
    }

    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.storage[node.index() as usize].high;
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    /// Cofactors of `node` with respect to `v`, which must not be below its top variable.
    fn cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        if self.variable(node) != v {
            (node, node)
        } else {
            (self.low_node(node), self.high_node(node))
        }
    }

    pub fn mk_node(&mut self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        if low == high {
            return low;
        }
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        let (i, _) = self.storage.put(Node {
            variable: v,
            low,
            high,
        });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&mut self, v: u32) -> Ref {
        let (zero, one) = (self.zero, self.one);
        self.mk_node(v, zero, one)
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    pub fn apply_ite(&mut self, f: Ref, g: Ref, h: Ref) -> Ref {
        let mut tasks = vec![IteTask::Call(f, g, h)];
        let mut results: Vec<Ref> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                IteTask::Call(f, g, h) => match self.ite_step(f, g, h) {
                    IteStep::Done(res) => results.push(res),
                    IteStep::Split {
                        v,
                        key,
                        negate,
                        high,
                        low,
                    } => {
                        // The high result is pushed first, so it sits below the low one.
                        tasks.push(IteTask::Join { v, key, negate });
                        tasks.push(IteTask::Call(low.0, low.1, low.2));
                        tasks.push(IteTask::Call(high.0, high.1, high.2));
                    }
                },
                IteTask::Join { v, key, negate } => {
                    let (Some(e), Some(t)) = (results.pop(), results.pop()) else {
                        unreachable!("every split yields two results");
                    };
                    let res = self.mk_node(v, e, t);
                    debug!("ite({}, {}, {}) = {}", key.0, key.1, key.2, res);
                    self.cache.insert(key, res);
                    results.push(if negate { -res } else { res });
                }
            }
        }

        assert_eq!(results.len(), 1, "ITE must yield exactly one result");
        results[0]
    }

    /// One level of ITE: either the answer, or the top variable with both cofactor triples.
    fn ite_step(&self, f: Ref, mut g: Ref, mut h: Ref) -> IteStep {
        loop {
            // Terminal cases.
            if self.is_one(f) || g == h {
                return IteStep::Done(g);
            }
            if self.is_zero(f) {
                return IteStep::Done(h);
            }
            if self.is_one(g) && self.is_zero(h) {
                return IteStep::Done(f);
            }
            if self.is_zero(g) && self.is_one(h) {
                return IteStep::Done(-f);
            }

            // Standard triples: replace arguments equal to (the complement of) F by constants.
            //   ite(F,F,H) => ite(F,1,H)     ite(F,~F,H) => ite(F,0,H)
            //   ite(F,G,F) => ite(F,G,0)     ite(F,G,~F) => ite(F,G,1)
            if g == f {
                g = self.one;
            } else if g == -f {
                g = self.zero;
            }
            if h == f {
                h = self.zero;
            } else if h == -f {
                h = self.one;
            }
            if g == h || (self.is_terminal(g) && self.is_terminal(h)) {
                continue;
            }
            break;
        }

        // ite(~F,G,H) => ite(F,H,G)
        let (f, g, h) = if f.is_negated() { (-f, h, g) } else { (f, g, h) };
        // ite(F,~G,H) => ~ite(F,G,~H)
        let (g, h, negate) = if g.is_negated() {
            (-g, -h, true)
        } else {
            (g, h, false)
        };

        let key = IteKey(f, g, h);
        if let Some(&res) = self.cache.get(&key) {
            return IteStep::Done(if negate { -res } else { res });
        }

        let v = self.variable(f).max(self.variable(g)).max(self.variable(h));
        let (f0, f1) = self.cofactors(f, v);
        let (g0, g1) = self.cofactors(g, v);
        let (h0, h1) = self.cofactors(h, v);

        IteStep::Split {
            v,
            key,
            negate,
            high: (f1, g1, h1),
            low: (f0, g0, h0),
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&mut self, u: Ref, v: Ref) -> Ref {
        let zero = self.zero;
        self.apply_ite(u, v, zero)
    }

    pub fn apply_or(&mut self, u: Ref, v: Ref) -> Ref {
        let one = self.one;
        self.apply_ite(u, one, v)
    }

    /// Number of distinct internal nodes reachable from `f`.
    pub fn size(&self, f: Ref) -> usize {
        let mut seen = HashSet::new();
        let mut stack = vec![f.index()];
        while let Some(i) = stack.pop() {
            if i == 1 || !seen.insert(i) {
                continue;
            }
            let node = Ref::positive(i);
            stack.push(self.low_node(node).index());
            stack.push(self.high_node(node).index());
        }
        seen.len()
    }
}

impl Default for BddSolver {
    fn default() -> Self {
        BddSolver::new(16, 16)
    }
}

impl Solver for BddSolver {
    type Object = Ref;

    fn name(&self) -> &'static str {
        "bdd"
    }

    fn const_true(&mut self) -> Ref {
        self.one
    }

    fn const_false(&mut self) -> Ref {
        self.zero
    }

    fn new_var(&mut self, name: &str) -> Ref {
        self.num_vars += 1;
        let v = self.num_vars;
        self.names.insert(v, name.to_string());
        self.mk_var(v)
    }

    fn not(&mut self, object: &Ref) -> Ref {
        self.apply_not(*object)
    }

    fn and(&mut self, objects: &[Ref]) -> Ref {
        let mut res = self.one;
        for &o in objects {
            res = self.apply_and(res, o);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    fn or(&mut self, objects: &[Ref]) -> Ref {
        let mut res = self.zero;
        for &o in objects {
            res = self.apply_or(res, o);
            if self.is_one(res) {
                break;
            }
        }
        res
    }

    fn is_sat(&mut self, object: &Ref) -> Result<bool, SolverError> {
        Ok(!self.is_zero(*object))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let mut bdd = BddSolver::default();
        let x = bdd.mk_var(1);

        assert_eq!(bdd.variable(x), 1);
        assert_eq!(bdd.high_node(x), bdd.one);
        assert_eq!(bdd.low_node(x), bdd.zero);

        let not_x = -x;
        assert_eq!(bdd.high_node(not_x), bdd.zero);
        assert_eq!(bdd.low_node(not_x), bdd.one);
    }

    #[test]
    fn test_terminal() {
        let bdd = BddSolver::default();

        assert!(bdd.is_terminal(bdd.zero));
        assert!(bdd.is_zero(bdd.zero));
        assert!(!bdd.is_one(bdd.zero));
        assert!(bdd.is_one(bdd.one));
        assert_eq!(bdd.variable(bdd.one), 0);
    }

    #[test]
    fn test_de_morgan() {
        let mut bdd = BddSolver::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        let f = -bdd.apply_and(x, y);
        let g = bdd.apply_or(-x, -y);
        assert_eq!(f, g);

        let f = -bdd.apply_or(x, y);
        let g = bdd.apply_and(-x, -y);
        assert_eq!(f, g);
    }

    #[test]
    fn test_canonical_commutativity() {
        let mut bdd = BddSolver::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let z = bdd.mk_var(3);

        let xy = bdd.apply_and(x, y);
        let f = bdd.apply_or(xy, z);
        let zy = bdd.apply_or(z, y);
        let zx = bdd.apply_or(z, x);
        let g = bdd.apply_and(zy, zx);
        assert_eq!(f, g);
        assert_eq!(bdd.size(f), 3);
    }

    #[test]
    fn test_contradiction_and_tautology() {
        let mut bdd = BddSolver::default();
        let x = bdd.new_var("x0");
        let nx = bdd.not(&x);

        let f = bdd.and(&[x, nx]);
        assert_eq!(f, bdd.zero);
        assert_eq!(bdd.is_sat(&f), Ok(false));

        let g = bdd.or(&[x, nx]);
        assert_eq!(g, bdd.one);
        assert_eq!(bdd.is_sat(&g), Ok(true));
    }

    #[test]
    fn test_xor_unsat() {
        let mut bdd = BddSolver::default();
        let x = bdd.new_var("a");
        let y = bdd.new_var("b");
        let x_or_y = bdd.or(&[x, y]);
        let nx = bdd.not(&x);
        let ny = bdd.not(&y);
        let f = bdd.and(&[x_or_y, nx, ny]);
        assert_eq!(bdd.is_sat(&f), Ok(false));
        assert_eq!(bdd.name_of(1), Some("a"));
        assert_eq!(bdd.num_vars(), 2);
    }

    #[test]
    fn test_newest_variable_on_top() {
        let mut bdd = BddSolver::default();
        let x = bdd.new_var("x");
        let y = bdd.new_var("y");
        let f = bdd.and(&[x, y]);
        assert_eq!(bdd.variable(f), 2);
        assert_eq!(bdd.high_node(f), x);
        assert_eq!(bdd.low_node(f), bdd.zero);
    }

    #[test]
    fn test_deep_ite() {
        let mut bdd = BddSolver::default();
        let bottom = bdd.new_var("x0");
        let vars: Vec<Ref> = (1..100_000).map(|i| bdd.new_var(&format!("x{}", i))).collect();
        let chain = bdd.and(&vars);
        assert_eq!(bdd.size(chain), vars.len());

        // The bottom variable sits below the whole chain.
        let f = bdd.and(&[chain, bottom]);
        assert_eq!(bdd.is_sat(&f), Ok(true));
        assert_eq!(bdd.size(f), vars.len() + 1);

        let nb = bdd.not(&bottom);
        let g = bdd.and(&[f, nb]);
        assert_eq!(bdd.is_sat(&g), Ok(false));
    }

    #[test]
    fn test_cache_is_used() {
        let mut bdd = BddSolver::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let z = bdd.mk_var(3);
        let xy = bdd.apply_and(x, y);
        let a = bdd.apply_and(xy, z);
        let b = bdd.apply_and(xy, z);
        assert_eq!(a, b);
        assert!(bdd.cache().hits() > 0);
    }
}
