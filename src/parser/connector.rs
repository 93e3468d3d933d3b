use crate::flow::{DEFAULT_ARROW, Edge, EdgeData, Node};
use itertools::Itertools;

const SEQUENTIAL_SHAPES: [&str; 3] = ["activity", "start", "stop"];

/// Chains consecutive activity, start and stop nodes with implicit edges.
///
/// Pairs already joined by an edge in the same direction are left alone.
/// Branches and loop back-edges are not inferred.
pub(super) fn connect_sequential(nodes: &[Node], edges: &mut Vec<Edge>) {
    let chain: Vec<&Node> = nodes
        .iter()
        .filter(|n| {
            n.data
                .shape
                .as_deref()
                .is_some_and(|shape| SEQUENTIAL_SHAPES.contains(&shape))
        })
        .collect();

    for (index, (current, next)) in chain.iter().tuple_windows().enumerate() {
        if edges.iter().any(|e| e.connects(&current.id, &next.id)) {
            continue;
        }
        edges.push(Edge {
            id: format!("implicit_edge_{}", index),
            source: current.id.clone(),
            target: next.id.clone(),
            kind: Some("default".to_string()),
            label: None,
            data: EdgeData {
                arrow: Some(DEFAULT_ARROW.to_string()),
                implicit: Some(true),
                ..EdgeData::default()
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{NodeData, NodeKind, Position};

    fn node(id: &str, shape: &str) -> Node {
        Node::new(
            id,
            NodeKind::Instruction,
            Position::default(),
            NodeData::labeled(id).with_shape(shape),
        )
    }

    #[test]
    fn test_skips_non_sequential_shapes() {
        let nodes = vec![
            node("s", "start"),
            node("r", "rectangle"),
            node("a", "activity"),
            node("e", "stop"),
        ];
        let mut edges = Vec::new();
        connect_sequential(&nodes, &mut edges);
        let pairs: Vec<_> = edges
            .iter()
            .map(|e| (e.id.as_str(), e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("implicit_edge_0", "s", "a"), ("implicit_edge_1", "a", "e")]
        );
        assert!(edges.iter().all(|e| e.data.is_implicit()));
    }

    #[test]
    fn test_existing_edge_is_not_duplicated() {
        let nodes = vec![node("a", "activity"), node("b", "activity"), node("c", "activity")];
        let mut edges = vec![Edge::new("edge_1", "a", "b")];
        connect_sequential(&nodes, &mut edges);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].id, "implicit_edge_1");
    }
}
