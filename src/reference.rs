use std::fmt::{Display, Formatter};
use std::ops::Neg;

use crate::utils::MyHash;

/// Complement-edge reference to a BDD node.
///
/// The sign carries the complement bit, the magnitude is the node index
/// (never 0: index 1 is the terminal).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ref(i32);

impl Ref {
    pub const fn positive(index: u32) -> Self {
        Self(index as i32)
    }

    pub const fn negative(index: u32) -> Self {
        Self(-(index as i32))
    }

    pub const fn is_negated(&self) -> bool {
        self.0 < 0
    }

    /// Return the index of the referenced node.
    pub const fn index(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// The same node with the complement bit cleared.
    pub const fn regular(self) -> Self {
        Self::positive(self.index())
    }

    /// Return the internal representation of the reference.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Injective mapping into `u64`, usable as a hash key.
    pub(crate) const fn unsigned(self) -> u64 {
        ((self.index() as u64) << 1) | self.is_negated() as u64
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl MyHash for Ref {
    fn hash(&self) -> u64 {
        self.unsigned()
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}",
            if self.is_negated() { "~" } else { "" },
            self.index()
        )
    }
}
