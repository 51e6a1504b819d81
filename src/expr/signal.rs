use std::fmt::{Debug, Display, Formatter};
use std::ops::Not;

use crate::types::NodeId;

/// A possibly complemented edge into an and-inverter graph.
///
/// The low bit is the complement flag, the remaining bits are the node
/// index. Index 0 is the constant node, so `Signal::zero()` is constant
/// false and its complement `Signal::one()` is constant true.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Signal(u32);

// Constructors
impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    pub const fn from_index(index: u32) -> Self {
        Self(index << 1)
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

// Getters
impl Signal {
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> u32 {
        self.0 >> 1
    }

    /// The signal with the complement flag cleared.
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }
}

// Checks
impl Signal {
    pub const fn is_const(self) -> bool {
        self.index() == 0
    }

    pub const fn is_negated(self) -> bool {
        self.0 & 1 != 0
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Self {
        if b {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

impl From<NodeId> for Signal {
    fn from(node: NodeId) -> Self {
        Self(node.raw())
    }
}

impl From<Signal> for NodeId {
    fn from(signal: Signal) -> Self {
        NodeId::new(signal.0)
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_const() {
            write!(f, "{}", self.0 & 1)
        } else {
            if self.is_negated() {
                write!(f, "!")?;
            }
            write!(f, "n{}", self.index())
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const() {
        let zero = Signal::zero();
        let one = Signal::one();

        assert!(zero.is_const());
        assert!(one.is_const());

        assert_eq!(zero, !one);
        assert_eq!(one, !zero);

        assert!(!zero.is_negated());
        assert!(one.is_negated());
        assert_eq!(one.regular(), zero);
    }

    #[test]
    fn test_node_id_roundtrip() {
        let s = !Signal::from_index(7);
        let id: NodeId = s.into();
        assert_eq!(Signal::from(id), s);
        assert_eq!(s.index(), 7);
        assert_eq!(s.to_string(), "!n7");
    }
}
