//! Native expression library: n-ary boolean formula DAG.
//!
//! Nodes are stored in a hash-consing [`Table`], so two requests for the
//! same structure (same kind, same variable name, same children in the
//! same order) return the same [`NodeId`]. No algebraic simplification
//! happens here: `x & !x` is kept as an AND node, deciding it is the
//! solver's job.

use log::debug;

use crate::expr::ExprLib;
use crate::table::Table;
use crate::types::{NodeId, NodeKind};
use crate::utils::{hash_str, pairing2, pairing_many, MyHash};

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub enum ExprNode {
    #[default]
    True,
    False,
    Var(String),
    Not(NodeId),
    And(Box<[NodeId]>),
    Or(Box<[NodeId]>),
}

impl ExprNode {
    fn tag(&self) -> u64 {
        match self {
            ExprNode::True => 1,
            ExprNode::False => 2,
            ExprNode::Var(_) => 3,
            ExprNode::Not(_) => 4,
            ExprNode::And(_) => 5,
            ExprNode::Or(_) => 6,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ExprNode::True => NodeKind::True,
            ExprNode::False => NodeKind::False,
            ExprNode::Var(_) => NodeKind::Variable,
            ExprNode::Not(_) => NodeKind::Not,
            ExprNode::And(_) => NodeKind::And,
            ExprNode::Or(_) => NodeKind::Or,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            ExprNode::True | ExprNode::False | ExprNode::Var(_) => &[],
            ExprNode::Not(child) => std::slice::from_ref(child),
            ExprNode::And(children) | ExprNode::Or(children) => children,
        }
    }
}

impl MyHash for ExprNode {
    fn hash(&self) -> u64 {
        match self {
            ExprNode::Var(name) => pairing2(self.tag(), hash_str(name)),
            _ => pairing_many(
                self.tag(),
                self.children().iter().map(|c| c.raw() as u64),
            ),
        }
    }
}

#[derive(Debug)]
pub struct NativeExpr {
    nodes: Table<ExprNode>,
}

impl NativeExpr {
    pub fn new(storage_bits: usize) -> Self {
        Self {
            nodes: Table::new(storage_bits),
        }
    }

    /// Number of distinct nodes built so far.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, node: NodeId) -> &ExprNode {
        &self.nodes[node.index()]
    }

    fn put(&mut self, node: ExprNode) -> NodeId {
        let (index, fresh) = self.nodes.put(node);
        if fresh {
            debug!("native: new node #{} = {:?}", index, self.nodes[index]);
        }
        NodeId::new(index as u32)
    }

    /// Render `root` with an explicit stack, so long chains print fine.
    fn write_node(&self, root: NodeId, out: &mut String) {
        enum Piece {
            Node(NodeId),
            Text(&'static str),
        }

        let mut stack = vec![Piece::Node(root)];
        while let Some(piece) = stack.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Piece::Node(node) => node,
            };
            match self.node(node) {
                ExprNode::True => out.push_str("true"),
                ExprNode::False => out.push_str("false"),
                ExprNode::Var(name) => out.push_str(name),
                ExprNode::Not(child) => {
                    out.push('!');
                    stack.push(Piece::Node(*child));
                }
                ExprNode::And(children) | ExprNode::Or(children) => {
                    let sep = if matches!(self.node(node), ExprNode::And(_)) {
                        " & "
                    } else {
                        " | "
                    };
                    out.push('(');
                    stack.push(Piece::Text(")"));
                    for (i, &child) in children.iter().enumerate().rev() {
                        stack.push(Piece::Node(child));
                        if i > 0 {
                            stack.push(Piece::Text(sep));
                        }
                    }
                }
            }
        }
    }
}

impl Default for NativeExpr {
    fn default() -> Self {
        NativeExpr::new(16)
    }
}

impl ExprLib for NativeExpr {
    fn name(&self) -> &'static str {
        "native"
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_index(node.index())
    }

    fn classify(&self, node: NodeId) -> NodeKind {
        self.node(node).kind()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).children().to_vec()
    }

    fn label(&self, node: NodeId) -> String {
        match self.node(node) {
            ExprNode::Var(name) => name.clone(),
            _ => self.print(node),
        }
    }

    fn mk_true(&mut self) -> NodeId {
        self.put(ExprNode::True)
    }

    fn mk_false(&mut self) -> NodeId {
        self.put(ExprNode::False)
    }

    fn mk_var(&mut self, name: &str) -> NodeId {
        self.put(ExprNode::Var(name.to_string()))
    }

    fn mk_not(&mut self, node: NodeId) -> NodeId {
        self.put(ExprNode::Not(node))
    }

    fn mk_and(&mut self, nodes: &[NodeId]) -> NodeId {
        if nodes.is_empty() {
            return self.mk_true();
        }
        self.put(ExprNode::And(nodes.into()))
    }

    fn mk_or(&mut self, nodes: &[NodeId]) -> NodeId {
        if nodes.is_empty() {
            return self.mk_false();
        }
        self.put(ExprNode::Or(nodes.into()))
    }

    fn structural_eq(&self, a: NodeId, b: NodeId) -> bool {
        // Children are hash-consed, so comparing one level is enough.
        a == b || self.node(a) == self.node(b)
    }

    fn structural_hash(&self, node: NodeId) -> u64 {
        MyHash::hash(self.node(node))
    }

    fn print(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_hash_consing() {
        let mut lib = NativeExpr::new(4);
        let x = lib.mk_var("x0");
        let y = lib.mk_var("x1");
        let f = lib.mk_and(&[x, y]);
        let g = lib.mk_and(&[x, y]);
        assert_eq!(f, g);
        assert_eq!(lib.mk_var("x0"), x);
        assert!(lib.structural_eq(f, g));
        assert_eq!(lib.structural_hash(f), lib.structural_hash(g));
        assert_eq!(lib.size(), 3);
    }

    #[test]
    fn test_order_matters() {
        let mut lib = NativeExpr::default();
        let x = lib.mk_var("a");
        let y = lib.mk_var("b");
        let f = lib.mk_or(&[x, y]);
        let g = lib.mk_or(&[y, x]);
        assert_ne!(f, g);
        assert!(!lib.structural_eq(f, g));
    }

    #[test]
    fn test_classify() {
        let mut lib = NativeExpr::default();
        let t = lib.mk_true();
        let x = lib.mk_var("x");
        let nx = lib.mk_not(x);
        let f = lib.mk_and(&[x, nx, t]);

        assert_eq!(lib.classify(t), NodeKind::True);
        assert_eq!(lib.classify(x), NodeKind::Variable);
        assert_eq!(lib.classify(nx), NodeKind::Not);
        assert_eq!(lib.children(nx), vec![x]);
        assert_eq!(lib.classify(f), NodeKind::And);
        assert_eq!(lib.children(f), vec![x, nx, t]);
        assert!(lib.children(x).is_empty());
        assert_eq!(lib.label(x), "x");
    }

    #[test]
    fn test_empty_connectives() {
        let mut lib = NativeExpr::default();
        let t = lib.mk_true();
        let f = lib.mk_false();
        assert_eq!(lib.mk_and(&[]), t);
        assert_eq!(lib.mk_or(&[]), f);
        assert_ne!(t, f);
    }

    #[test]
    fn test_print() {
        let mut lib = NativeExpr::default();
        let x = lib.mk_var("x0");
        let y = lib.mk_var("x1");
        let nx = lib.mk_not(x);
        let f = lib.mk_and(&[nx, y]);
        let g = lib.mk_or(&[f, x]);
        assert_eq!(lib.print(g), "((!x0 & x1) | x0)");
        let t = lib.mk_true();
        assert_eq!(lib.print(t), "true");
    }

    #[test]
    fn test_print_deep_chain() {
        let mut lib = NativeExpr::default();
        let mut f = lib.mk_var("x0");
        for i in 1..50_000 {
            let v = lib.mk_var(&format!("x{}", i));
            let nf = lib.mk_not(f);
            f = lib.mk_and(&[nf, v]);
        }
        let printed = lib.print(f);
        assert!(printed.starts_with("(!(!("));
        assert!(printed.ends_with(" & x49999)"));
    }

    #[test]
    fn test_contains() {
        let mut lib = NativeExpr::default();
        let x = lib.mk_var("x");
        assert!(lib.contains(x));
        assert!(!lib.contains(NodeId::new(0)));
        assert!(!lib.contains(NodeId::new(42)));
    }
}
