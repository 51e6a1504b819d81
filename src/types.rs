//! Small value types shared across the crate.
//!
//! Newtype wrappers keep formula-node indices apart from solver literals.
use std::fmt;
use std::ops::Neg;

/// Tri-state satisfiability status of a cache entry.
///
/// # Invariants
///
/// - A status only ever moves `Unknown -> Sat` or `Unknown -> Unsat`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Status {
    Unknown,
    Sat,
    Unsat,
}

impl Status {
    /// Returns `true` for `Sat` and `Unsat`.
    pub fn is_decided(self) -> bool {
        !matches!(self, Status::Unknown)
    }

    /// The decided answer, if any.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Status::Unknown => None,
            Status::Sat => Some(true),
            Status::Unsat => Some(false),
        }
    }
}

impl From<bool> for Status {
    fn from(sat: bool) -> Self {
        if sat {
            Status::Sat
        } else {
            Status::Unsat
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Unknown => write!(f, "UNKNOWN"),
            Status::Sat => write!(f, "SAT"),
            Status::Unsat => write!(f, "UNSAT"),
        }
    }
}

/// The kind of a formula-tree node, as reported by an expression library.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeKind {
    True,
    False,
    Variable,
    Not,
    And,
    Or,
}

impl NodeKind {
    /// Returns `true` if `arity` children are acceptable for this kind.
    pub fn accepts_arity(self, arity: usize) -> bool {
        match self {
            NodeKind::True | NodeKind::False | NodeKind::Variable => arity == 0,
            NodeKind::Not => arity == 1,
            NodeKind::And | NodeKind::Or => arity >= 1,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::True => "TRUE",
            NodeKind::False => "FALSE",
            NodeKind::Variable => "VARIABLE",
            NodeKind::Not => "NOT",
            NodeKind::And => "AND",
            NodeKind::Or => "OR",
        };
        f.write_str(s)
    }
}

/// Backend-independent handle to a formula-tree node.
///
/// Each expression library decides what the raw value means (an arena
/// index for [`NativeExpr`][crate::expr::native::NativeExpr], a literal
/// for [`Aig`][crate::expr::aig::Aig]).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A solver variable identifier (1-indexed, DIMACS style).
///
/// # Invariants
///
/// - Variable IDs must be >= 1 (0 cannot be negated in DIMACS)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }

    pub fn pos(self) -> Lit {
        Lit::new(self, false)
    }

    pub fn neg(self) -> Lit {
        Lit::new(self, true)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A solver literal: a variable with a polarity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(u32);

impl Lit {
    pub fn new(var: Var, negated: bool) -> Self {
        Lit((var.id() << 1) | negated as u32)
    }

    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    pub fn is_negated(self) -> bool {
        self.0 & 1 != 0
    }

    pub fn is_positive(self) -> bool {
        !self.is_negated()
    }

    pub fn from_dimacs(lit: i32) -> Self {
        assert_ne!(lit, 0, "DIMACS literal must be non-zero");
        Lit::new(Var::new(lit.unsigned_abs()), lit < 0)
    }

    pub fn to_dimacs(self) -> i32 {
        let v = self.var().id() as i32;
        if self.is_negated() {
            -v
        } else {
            v
        }
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Lit(self.0 ^ 1)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}
