//! Size measurements taken before any geometry is built

use crate::recipe::RecipeNode;
use crate::recipe::path::NodePath;

/// Direct children of `node` in document order.
fn children(node: &RecipeNode) -> &[RecipeNode] {
    match node {
        RecipeNode::Cuboid { .. } | RecipeNode::Sphere { .. } | RecipeNode::Cylinder { .. } => &[],
        RecipeNode::Union { children }
        | RecipeNode::Subtract { children }
        | RecipeNode::Intersect { children } => children,
        RecipeNode::Translate { child, .. }
        | RecipeNode::Rotate { child, .. }
        | RecipeNode::Scale { child, .. } => std::slice::from_ref(child.as_ref()),
    }
}

/// Number of nodes in the subtree rooted at `node`, the node itself included.
///
/// Primitives count one. Combinators count one plus their children, and
/// transforms one plus their child.
pub fn count_nodes(node: &RecipeNode) -> usize {
    let mut count = 0;
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(children(node));
    }
    count
}

/// Number of node levels from `node` down to its deepest leaf, counting both.
pub fn depth(node: &RecipeNode) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(node, 1)];
    while let Some((node, level)) = stack.pop() {
        deepest = deepest.max(level);
        stack.extend(children(node).iter().map(|child| (child, level + 1)));
    }
    deepest
}

/// The node requesting the most tessellation segments, with its path.
///
/// Primitives without an explicit `segments` are skipped. Ties resolve to the
/// first such node in document order.
pub fn max_segments(node: &RecipeNode, path: &NodePath) -> Option<(NodePath, u32)> {
    let mut best: Option<(NodePath, u32)> = None;
    let mut stack = vec![(node, path.clone())];
    while let Some((node, path)) = stack.pop() {
        match node {
            RecipeNode::Sphere { segments: Some(n), .. }
            | RecipeNode::Cylinder { segments: Some(n), .. } => {
                if best.as_ref().is_none_or(|(_, most)| n > most) {
                    best = Some((path, *n));
                }
            },
            RecipeNode::Cuboid { .. } | RecipeNode::Sphere { .. } | RecipeNode::Cylinder { .. } => {},
            RecipeNode::Union { children }
            | RecipeNode::Subtract { children }
            | RecipeNode::Intersect { children } => {
                let children_path = path.key("children");
                // reversed so the first child is popped first
                stack.extend(
                    children
                        .iter()
                        .enumerate()
                        .rev()
                        .map(|(i, child)| (child, children_path.index(i))),
                );
            },
            RecipeNode::Translate { child, .. }
            | RecipeNode::Rotate { child, .. }
            | RecipeNode::Scale { child, .. } => stack.push((child.as_ref(), path.key("child"))),
        }
    }
    best
}
