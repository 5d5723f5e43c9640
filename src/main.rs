use anyhow::{bail, Context, Result};
use clap::Parser;
use csv::{ReaderBuilder, Writer};
use digraph_sssp::{DiGraph, DijkstraSolver, DEFAULT_WEIGHT};
use ordered_float::OrderedFloat;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "sssp")]
#[command(about = "Build a directed graph from a CSV edge list (source,target[,weight]) and run Dijkstra from a source label.", long_about = None)]
struct Cli {
    /// Path to the .csv file
    #[arg(short, long)]
    csv: String,

    /// Label of the source node
    #[arg(short, long)]
    source: String,

    /// Print the shortest path to this label
    #[arg(short, long)]
    target: Option<String>,

    /// Output CSV (node, distance). If omitted, prints a summary to stdout.
    #[arg(short, long)]
    out: Option<String>,

    /// Include unreachable nodes in output with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,
}

fn parse_csv_and_build_graph(path: &str) -> Result<DiGraph<String>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {path}"))?;

    let mut graph = DiGraph::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let (Some(source), Some(target)) = (record.get(0), record.get(1)) else {
            bail!("row {}: expected source,target[,weight]", line + 1);
        };
        let weight = match record.get(2).map(str::trim) {
            Some(w) if !w.is_empty() => w
                .parse::<f64>()
                .with_context(|| format!("row {}: bad weight {w:?}", line + 1))?,
            _ => DEFAULT_WEIGHT,
        };

        let (source, target) = (source.trim().to_string(), target.trim().to_string());
        graph.add_node(source.clone());
        graph.add_node(target.clone());
        let added = graph
            .add_weighted_edge(&source, &target, weight)
            .with_context(|| format!("row {}", line + 1))?;
        if !added {
            warn!(%source, %target, "duplicate edge ignored");
        }
    }
    Ok(graph)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let graph = parse_csv_and_build_graph(&cli.csv)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );

    let mut solver = DijkstraSolver::new(&graph).context("building solver")?;
    solver
        .compute_shortest_paths_from(&cli.source)
        .with_context(|| format!("running from {}", cli.source))?;

    if let Some(target) = &cli.target {
        match solver.shortest_path_to(target)? {
            Some(path) => println!("{}", solver.print_path(&path)),
            None => println!("No path from {} to {}", cli.source, target),
        }
    }

    let mut dist_with_label: Vec<(&String, f64)> = Vec::with_capacity(graph.node_count());
    for node in graph.iter_nodes() {
        dist_with_label.push((node.label(), solver.distance_to(node.label())?));
    }
    dist_with_label.sort_by_key(|&(_, d)| OrderedFloat(d));

    if let Some(out_path) = cli.out {
        let mut wtr =
            Writer::from_path(&out_path).with_context(|| format!("creating CSV {out_path}"))?;
        wtr.write_record(["node", "distance"])?;
        for (label, d) in &dist_with_label {
            if d.is_finite() || cli.include_unreachable {
                let val = if d.is_finite() {
                    format!("{d:.6}")
                } else {
                    String::from("inf")
                };
                wtr.write_record([label.as_str(), val.as_str()])?;
            }
        }
        wtr.flush()?;
        info!(rows = dist_with_label.len(), path = %out_path, "wrote distances");
    } else {
        let reachable = dist_with_label.iter().filter(|(_, d)| d.is_finite()).count();
        println!("Nodes: {}", dist_with_label.len());
        println!("Reachable from {}: {}", cli.source, reachable);
        if let Some((label, maxd)) = dist_with_label.iter().rev().find(|(_, d)| d.is_finite()) {
            println!("Max finite distance: {maxd:.2} ({label})");
        }
    }

    Ok(())
}
