use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fieldcg::flow_graph::{FlowGraph, Vertex};
use fieldcg::reachability::Reachability;

/// A long `a -> b -> c -> ...` chain with periodic fan-out, roughly modeling
/// a deep call chain through a handful of shared utility properties (the
/// shape that makes field-based conflation expensive: many call-sites all
/// routing through the same few `Prop` vertices).
fn build_chain_graph(depth: usize, fan_out: usize) -> FlowGraph {
    let mut graph = FlowGraph::new();
    let mut previous = graph.intern(Vertex::Glob("root".to_owned()));
    for i in 0..depth {
        let next = graph.intern(Vertex::Glob(format!("node{i}")));
        graph.add_edge(previous, next);
        for j in 0..fan_out {
            let leaf = graph.intern(Vertex::Prop(format!("leaf{i}_{j}")));
            graph.add_edge(next, leaf);
        }
        previous = next;
    }
    graph
}

fn bench_closure(c: &mut Criterion) {
    let graph = build_chain_graph(500, 4);
    let root = graph.get(&Vertex::Glob("root".to_owned())).unwrap();

    c.bench_function("reachability_closure_cold", |b| {
        b.iter(|| {
            let mut reach = Reachability::new(&graph);
            black_box(reach.closure(root).len());
        });
    });

    c.bench_function("reachability_closure_memoized", |b| {
        let mut reach = Reachability::new(&graph);
        reach.closure(root);
        b.iter(|| {
            black_box(reach.closure(root).len());
        });
    });
}

criterion_group!(benches, bench_closure);
criterion_main!(benches);
