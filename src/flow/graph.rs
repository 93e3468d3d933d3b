use super::{Edge, Node};
use ahash::{AHashMap, AHashSet};

/// Returns true when the edges form at least one directed cycle among the given nodes.
///
/// Edges whose source is not a known node are ignored.
pub fn has_cycle(nodes: &[Node], edges: &[Edge]) -> bool {
    let mut adjacency: AHashMap<&str, Vec<&str>> =
        nodes.iter().map(|n| (n.id.as_str(), Vec::new())).collect();
    for edge in edges {
        if let Some(neighbors) = adjacency.get_mut(edge.source.as_str()) {
            neighbors.push(edge.target.as_str());
        }
    }

    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut on_stack: AHashSet<&str> = AHashSet::new();

    for node in nodes {
        let root = node.id.as_str();
        if visited.contains(root) {
            continue;
        }
        // (node, index of the next neighbor to visit)
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        visited.insert(root);
        on_stack.insert(root);

        while let Some((current, next)) = stack.last_mut() {
            let neighbors = adjacency.get(*current).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&neighbor) = neighbors.get(*next) {
                *next += 1;
                if on_stack.contains(neighbor) {
                    return true;
                }
                if visited.insert(neighbor) {
                    on_stack.insert(neighbor);
                    stack.push((neighbor, 0));
                }
            } else {
                on_stack.remove(*current);
                stack.pop();
            }
        }
    }
    false
}
