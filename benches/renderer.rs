use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use chronos_viz::config::LayoutConfig;
use chronos_viz::ir::{Edge, Graph, Node};
use chronos_viz::layout::{SequentialIds, compute_layout};
use chronos_viz::render::render_svg;
use chronos_viz::theme::Theme;
use std::hint::black_box;

fn chain_graph(nodes: usize) -> Graph {
    let mut graph = Graph::new();
    for i in 0..nodes {
        graph.nodes.push(Node::new(format!("N{i}")).with_label(format!("Node {i}")));
    }
    for i in 1..nodes {
        graph.edges.push(Edge::new(format!("N{}", i - 1), format!("N{i}")));
    }
    graph
}

fn dense_graph(nodes: usize, extra_edges: usize) -> Graph {
    let mut graph = chain_graph(nodes);
    let mut count = 0usize;
    'outer: for i in 0..nodes {
        for j in (i + 2)..nodes {
            if count >= extra_edges {
                break 'outer;
            }
            graph.edges.push(Edge::new(format!("N{i}"), format!("N{j}")));
            count += 1;
        }
    }
    graph
}

// Chain plus a feedback edge every `stride` nodes.
fn cyclic_graph(nodes: usize, stride: usize) -> Graph {
    let mut graph = chain_graph(nodes);
    for i in (stride..nodes).step_by(stride) {
        graph
            .edges
            .push(Edge::new(format!("N{i}"), format!("N{}", i - stride)));
    }
    graph
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    let cases = [
        ("chain_100".to_string(), chain_graph(100)),
        ("chain_10000".to_string(), chain_graph(10_000)),
        ("dense_80_320".to_string(), dense_graph(80, 320)),
        ("dense_400_4000".to_string(), dense_graph(400, 4_000)),
        ("cyclic_10000".to_string(), cyclic_graph(10_000, 7)),
    ];
    for (name, graph) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), graph, |b, graph| {
            b.iter(|| {
                let layout = compute_layout(black_box(graph), &config, &mut SequentialIds::new())
                    .expect("layout failed");
                black_box(layout.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let theme = Theme::midnight();
    let config = LayoutConfig::default();
    for (nodes, extra_edges) in [(40usize, 80usize), (80, 320), (400, 4_000)] {
        let name = format!("dense_{nodes}_{extra_edges}");
        let graph = dense_graph(nodes, extra_edges);
        let layout =
            compute_layout(&graph, &config, &mut SequentialIds::new()).expect("layout failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &layout, |b, layout| {
            b.iter(|| {
                let svg = render_svg(black_box(layout), &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::midnight();
    let config = LayoutConfig::default();
    for nodes in [50usize, 1_000, 10_000] {
        let graph = cyclic_graph(nodes, 5);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &graph, |b, graph| {
            b.iter(|| {
                let layout = compute_layout(black_box(graph), &config, &mut SequentialIds::new())
                    .expect("layout failed");
                let svg = render_svg(&layout, &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_render, bench_end_to_end);
criterion_main!(benches);
