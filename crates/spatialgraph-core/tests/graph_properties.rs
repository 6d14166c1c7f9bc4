//! End-to-end behaviour of the graph store across the compression lifecycle

use proptest::prelude::*;
use spatialgraph_core::{
    CostAggregate, Edge, Error, GraphStore, NodeId, Point, SharedGraph, Status, NO_COST,
};
use std::collections::HashSet;

type EdgeList = Vec<(u32, u32, f32)>;

fn arb_point() -> impl Strategy<Value = Point> {
    (0i32..6, 0i32..6, 0i32..2).prop_map(|(x, y, z)| Point::new(x as f64, y as f64, z as f64))
}

/// A node count and edges between those nodes, duplicates included
fn arb_graph() -> impl Strategy<Value = (u32, EdgeList)> {
    (1u32..20).prop_flat_map(|n| {
        let edge = (0..n, 0..n, 0u16..1000).prop_map(|(p, c, v)| (p, c, v as f32 / 10.0));
        (Just(n), prop::collection::vec(edge, 0..60))
    })
}

/// A graph plus node pairs to query, some of them outside the node range
fn arb_graph_and_pairs() -> impl Strategy<Value = (u32, EdgeList, Vec<(u32, u32)>)> {
    arb_graph().prop_flat_map(|(n, edges)| {
        let pairs = prop::collection::vec((0..n + 2, 0..n + 2), 1..40);
        (Just(n), Just(edges), pairs)
    })
}

/// Build an open graph over `n` nodes; returns it with the deduplicated edge list
fn build(n: u32, edges: &[(u32, u32, f32)]) -> (GraphStore, EdgeList) {
    let points = (0..n).map(|i| Point::new((i % 5) as f64, (i / 5) as f64, 0.5 * i as f64));
    let mut graph = GraphStore::with_nodes(points).unwrap();
    let mut inserted: EdgeList = Vec::new();

    for &(p, c, cost) in edges {
        graph.add_edge_by_id(NodeId(p), NodeId(c), cost, "").unwrap();

        // Later inserts of the same pair overwrite in place
        match inserted.iter_mut().find(|(ip, ic, _)| *ip == p && *ic == c) {
            Some(existing) => existing.2 = cost,
            None => inserted.push((p, c, cost)),
        }
    }
    (graph, inserted)
}

proptest! {
    #[test]
    fn repeated_points_keep_their_ids(points in prop::collection::vec(arb_point(), 1..120)) {
        let mut graph = GraphStore::new();
        let mut seen: Vec<(Point, NodeId)> = Vec::new();

        for point in points {
            let id = graph.add_node(point).unwrap();
            match seen.iter().find(|(p, _)| *p == point) {
                Some((_, known)) => prop_assert_eq!(*known, id),
                None => {
                    // New points get the next id
                    prop_assert_eq!(id.index(), seen.len());
                    seen.push((point, id));
                }
            }
        }
        prop_assert_eq!(graph.num_nodes(), seen.len());
    }

    #[test]
    fn exported_rows_contain_every_inserted_edge((n, edges) in arb_graph()) {
        let (mut graph, inserted) = build(n, &edges);
        graph.compress().unwrap();

        let csr = graph.export_csr("").unwrap();
        prop_assert!(csr.validate().is_ok());
        prop_assert_eq!(csr.nnz, inserted.len());
        prop_assert_eq!(csr.num_rows, n as usize);
        prop_assert_eq!(csr.num_cols, n as usize);

        for &(p, c, cost) in &inserted {
            let row: Vec<_> = csr.row(p as usize).collect();
            prop_assert!(
                row.contains(&(NodeId(c), cost)),
                "row {} is missing {} -> {} ({})",
                p,
                p,
                c,
                cost
            );
        }
    }

    #[test]
    fn csr_round_trip_preserves_insertion_order((n, edges) in arb_graph()) {
        let (mut graph, inserted) = build(n, &edges);
        graph.compress().unwrap();

        let rebuilt: EdgeList = graph
            .export_csr("")
            .unwrap()
            .edges()
            .into_iter()
            .map(|e| (e.parent.0, e.child.0, e.cost))
            .collect();

        // Grouped by parent, insertion order within each parent
        let mut expected = inserted.clone();
        expected.sort_by_key(|&(p, _, _)| p);
        prop_assert_eq!(rebuilt, expected);
    }

    #[test]
    fn alternate_costs_outside_topology_are_out_of_range(
        (n, edges, pairs) in arb_graph_and_pairs()
    ) {
        let (mut graph, inserted) = build(n, &edges);
        graph.compress().unwrap();
        let present: HashSet<(u32, u32)> = inserted.iter().map(|&(p, c, _)| (p, c)).collect();

        for (p, c) in pairs {
            let result = graph.set_edge_cost("energy", NodeId(p), NodeId(c), 1.0);
            if present.contains(&(p, c)) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(Error::OutOfRange { .. })), "expected Err(Error::OutOfRange), got {:?}", result);
                prop_assert_eq!(Status::of(&result), Status::OutOfRange);
            }
        }

        // Whatever was written stays inside the structural edge set
        if graph.has_cost_type("energy") {
            let alternate = graph.edges("energy").unwrap();
            prop_assert!(alternate
                .iter()
                .all(|e| present.contains(&(e.parent.0, e.child.0))));
        }
    }

    #[test]
    fn alternate_costs_before_compression_are_rejected(
        (n, edges, pairs) in arb_graph_and_pairs(),
        name in "[a-zA-Z]{1,12}",
    ) {
        let (mut graph, _) = build(n, &edges);

        for (p, c) in pairs {
            let result = graph.set_edge_cost(&name, NodeId(p), NodeId(c), 2.0);
            prop_assert!(matches!(result, Err(Error::NotCompressed { .. })), "expected Err(Error::NotCompressed), got {:?}", result);
            prop_assert_eq!(Status::of(&result), Status::NotCompressed);
        }
        prop_assert!(!graph.is_compressed());
    }
}

#[test]
fn missing_cost_types_and_unset_edges() {
    let mut graph = GraphStore::with_nodes([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]).unwrap();
    graph.add_edge_by_id(NodeId(0), NodeId(1), 1.0, "").unwrap();
    graph.add_edge_by_id(NodeId(1), NodeId(0), 1.0, "").unwrap();
    graph.compress().unwrap();
    graph.set_edge_cost("energy", NodeId(0), NodeId(1), 3.0).unwrap();

    assert_eq!(graph.get_edge_cost("energy", NodeId(1), NodeId(0)).unwrap(), NO_COST);
    let missing = graph.get_edge_cost("time", NodeId(0), NodeId(1));
    assert!(matches!(missing, Err(Error::NoSuchCostType(_))));
    assert_eq!(Status::of(&missing), Status::NoCost);
}

#[test]
fn three_node_scenario() {
    let mut graph =
        GraphStore::with_nodes([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]).unwrap();
    graph.add_edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0).unwrap();
    graph.add_edge([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], 2.0).unwrap();
    graph.compress().unwrap();

    let csr = graph.export_csr("").unwrap();
    assert_eq!((csr.nnz, csr.num_rows, csr.num_cols), (2, 3, 3));
    assert_eq!(csr.outer_indices, vec![0, 1, 2, 2]);

    let agg = graph.aggregate("", CostAggregate::Sum, true).unwrap();
    assert_eq!(agg.ids, vec![NodeId(0), NodeId(1), NodeId(2)]);
    assert_eq!(agg.values, vec![1.0, 2.0, 0.0]);

    let err = graph
        .set_edge_cost("energy", NodeId(0), NodeId(2), 5.0)
        .unwrap_err();
    assert!(matches!(err, Error::OutOfRange { .. }));
}

#[test]
fn six_edge_triangle_layout() {
    let mut graph = GraphStore::new();
    let n0 = [0.0, 0.0, 0.0];
    let n1 = [0.0, 1.0, 2.0];
    let n2 = [0.0, 1.0, 3.0];
    graph.add_edge(n0, n1, 1.0).unwrap();
    graph.add_edge(n0, n2, 2.0).unwrap();
    graph.add_edge(n1, n0, 3.0).unwrap();
    graph.add_edge(n1, n2, 4.0).unwrap();
    graph.add_edge(n2, n0, 5.0).unwrap();
    graph.add_edge(n2, n1, 6.0).unwrap();
    graph.compress().unwrap();

    let csr = graph.export_csr("").unwrap();
    assert_eq!(csr.data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(csr.outer_indices, vec![0, 2, 4, 6]);
    assert_eq!(csr.inner_indices, vec![1, 2, 0, 2, 0, 1]);

    let undirected = graph.aggregate("", CostAggregate::Sum, false).unwrap();
    // node 0: out 1+2, in 3+5
    assert_eq!(undirected.values, vec![11.0, 14.0, 17.0]);
}

/// Fixed edge set with duplicates and self loops over `n` nodes
fn woven_edges(n: u32, count: u32) -> EdgeList {
    (0..count)
        .map(|i| ((i * 7) % n, (i * 11 + 3) % n, 0.25 * i as f32))
        .collect()
}

#[test]
fn internal_defects_never_surface_in_normal_use() {
    let (mut graph, inserted) = build(15, &woven_edges(15, 60));
    graph.register_cost_type("time").unwrap();
    graph.compress().unwrap();

    let mut statuses = Vec::new();
    for &(p, c, cost) in &inserted {
        statuses.push(Status::of(&graph.set_edge_cost("time", NodeId(p), NodeId(c), cost * 2.0)));
        statuses.push(Status::of(&graph.get_edge_cost("time", NodeId(c), NodeId(p))));
    }
    for kind in CostAggregate::ALL {
        for directed in [true, false] {
            statuses.push(Status::of(&graph.aggregate("time", kind, directed)));
        }
    }
    statuses.push(Status::of(&graph.export_csr("time")));

    assert!(statuses.iter().all(|s| *s != Status::GenericError));
}

#[test]
fn shared_graph_matches_store() {
    let (mut graph, _) = build(12, &woven_edges(12, 40));
    graph.compress().unwrap();
    let expected = graph.export_csr("").unwrap();
    let expected_agg = graph.aggregate("", CostAggregate::Average, false).unwrap();

    let shared = SharedGraph::try_from(graph).unwrap();
    assert_eq!(shared.export_csr("").unwrap(), expected);
    assert_eq!(
        shared.aggregate("", CostAggregate::Average, false).unwrap(),
        expected_agg
    );

    let first: Edge = expected.edges()[0];
    shared
        .set_edge_cost("energy", first.parent, first.child, 8.0)
        .unwrap();
    assert_eq!(
        shared
            .get_edge_cost("energy", first.parent, first.child)
            .unwrap(),
        8.0
    );
}
