//! Folds a concrete syntax tree into an abstract syntax tree.
//!
//! Four rules, applied bottom-up: drop epsilon nodes; splice away helper
//! non-terminals (`...Tail`, `...List`, and primed nodes like `E'`) by
//! promoting their children in place; collapse single-child interior nodes
//! into their child; otherwise keep the node and reduce its children.

use crate::parser::Node;

pub fn cst_to_ast(node: &Node) -> Option<Node> {
    if node.is_epsilon() {
        return None;
    }

    let reduced_children = reduce_children(&node.children);

    if is_helper_label(&node.label) {
        return match reduced_children.len() {
            0 => None,
            1 => reduced_children.into_iter().next(),
            _ => Some(Node::interior(node.label.clone(), reduced_children, node.line)),
        };
    }

    if reduced_children.is_empty() && node.value.is_none() {
        return None;
    }

    if reduced_children.len() == 1 && node.value.is_none() {
        return Some(reduced_children.into_iter().next().unwrap());
    }

    Some(Node {
        label: node.label.clone(),
        value: node.value.clone(),
        line: node.line,
        children: reduced_children,
    })
}

/// Reduces a sibling list, splicing a helper child's own reduced children
/// straight into the result instead of nesting them under the helper's label.
fn reduce_children(children: &[Node]) -> Vec<Node> {
    let mut out = Vec::new();
    for child in children {
        if child.is_epsilon() {
            continue;
        }
        if is_helper_label(&child.label) {
            out.extend(reduce_children(&child.children));
        } else if let Some(reduced) = cst_to_ast(child) {
            out.push(reduced);
        }
    }
    out
}

fn is_helper_label(label: &str) -> bool {
    label.ends_with("Tail") || label.ends_with("List") || label.contains('\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_epsilon_leaves() {
        let tree = Node::interior("ElseStmt", vec![Node::epsilon()], 1);
        assert!(cst_to_ast(&tree).is_none());
    }

    #[test]
    fn splices_tail_helpers_into_the_parent() {
        let tail = Node::interior(
            "ExprAddTail",
            vec![
                Node::leaf("+", "+", 1),
                Node::leaf("ID", "b", 1),
                Node::interior("ExprAddTail", vec![Node::epsilon()], 1),
            ],
            1,
        );
        let parent = Node::interior("ExprAdd", vec![Node::leaf("ID", "a", 1), tail], 1);
        let reduced = cst_to_ast(&parent).expect("should reduce");
        assert_eq!(reduced.label, "ExprAdd");
        assert_eq!(reduced.children.len(), 3);
        assert_eq!(reduced.children[1].label, "+");
    }

    #[test]
    fn collapses_single_child_pass_through() {
        let tree = Node::interior("ExprPrimary", vec![Node::leaf("ID", "x", 2)], 2);
        let reduced = cst_to_ast(&tree).unwrap();
        assert_eq!(reduced.label, "ID");
        assert_eq!(reduced.value.as_deref(), Some("x"));
    }

    #[test]
    fn keeps_multi_child_nodes_with_label() {
        let tree = Node::interior(
            "AssignStmt",
            vec![Node::leaf("ID", "x", 3), Node::leaf("=", "=", 3), Node::leaf("INT_LITERAL", "1", 3)],
            3,
        );
        let reduced = cst_to_ast(&tree).unwrap();
        assert_eq!(reduced.label, "AssignStmt");
        assert_eq!(reduced.children.len(), 3);
    }
}
