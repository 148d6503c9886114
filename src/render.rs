/*
Conversion of a built forest into termtree display trees.

termtree wants owned child trees before the parent can be assembled, so the
forest is walked in post-order: when a record is visited, all of its children
are already finished and sit on top of the work stack, one level deeper.
 */
use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{iter_postorder, TreeNode};

/// One display tree per root, labelled with each record's `Display` output.
#[instrument(level = "debug", skip_all)]
pub fn render<N: TreeNode + Display>(roots: &[N]) -> Vec<Tree<String>> {
    let mut stack: Vec<(usize, Tree<String>)> = Vec::new();

    for (level, node) in iter_postorder(roots) {
        let first_child = stack
            .iter()
            .rposition(|(l, _)| *l <= level)
            .map_or(0, |pos| pos + 1);
        let leaves: Vec<Tree<String>> = stack.drain(first_child..).map(|(_, t)| t).collect();
        stack.push((level, Tree::new(node.to_string()).with_leaves(leaves)));
    }

    stack.into_iter().map(|(_, tree)| tree).collect()
}

/// Renders the whole forest as text, one root tree after another.
pub fn render_string<N: TreeNode + Display>(roots: &[N]) -> String {
    render(roots).iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn given_nested_forest_when_rendering_then_shape_is_preserved() {
        let mut a = Record::new(2, 1, "A");
        a.children = vec![Record::new(4, 2, "A1")];
        let mut root = Record::new(1, 0, "Root");
        root.children = vec![a, Record::new(3, 1, "B")];
        let forest = vec![root, Record::new(5, 0, "Other")];

        let trees = render(&forest);

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].root, "Root(1)");
        let children: Vec<&str> = trees[0].leaves.iter().map(|t| t.root.as_str()).collect();
        assert_eq!(children, vec!["A(2)", "B(3)"]);
        assert_eq!(trees[0].leaves[0].leaves[0].root, "A1(4)");
        assert!(trees[1].leaves.is_empty());
    }

    #[test]
    fn given_forest_when_rendering_string_then_every_record_appears() {
        let mut root = Record::new(1, 0, "Root");
        root.children = vec![Record::new(2, 1, "Leaf")];
        let text = render_string(&[root]);

        assert!(text.starts_with("Root(1)\n"));
        assert!(text.contains("Leaf(2)"));
    }

    #[test]
    fn given_empty_forest_when_rendering_then_nothing() {
        let forest: Vec<Record> = Vec::new();
        assert!(render(&forest).is_empty());
        assert!(render_string(&forest).is_empty());
    }
}
