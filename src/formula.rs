use std::fmt::{Display, Formatter};

use crate::types::NodeId;

/// Handle to a formula built through a [`Session`][crate::session::Session].
///
/// A handle is only meaningful for the session that created it. Both
/// expression libraries hash-cons their nodes, so two handles compare
/// equal exactly when the library considers their nodes structurally
/// equal; [`Session::formulas_equal`][crate::session::Session::formulas_equal]
/// asks the library directly.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Formula {
    node: NodeId,
}

impl Formula {
    pub const fn new(node: NodeId) -> Self {
        Self { node }
    }

    /// The wrapped formula-tree node.
    pub const fn node(self) -> NodeId {
        self.node
    }
}

impl From<NodeId> for Formula {
    fn from(node: NodeId) -> Self {
        Formula::new(node)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.node)
    }
}
