use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use plumewatch::session::format_clock;
use plumewatch::{
    catalog, NetworkGraph, NodeKind, Playback, PollutionStore, Session, Settings, Speed, Timestep,
};

#[derive(Parser, Debug)]
#[command(name = "plumewatch")]
#[command(about = "Inspect precomputed contaminant spread in a water network")]
struct Args {
    /// Settings file (defaults to ./plumewatch.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding examples/ and custom/ networks
    #[arg(short, long, global = true)]
    data_root: Option<PathBuf>,

    /// Network to open (defaults to the first example network)
    #[arg(short, long, global = true)]
    network: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available networks
    Networks,

    /// Summarise the network and its pollution scenarios
    Summary,

    /// List the nodes of the network with their attributes
    Nodes {
        /// Only show nodes of this type: junction, reservoir or tank
        #[arg(short, long)]
        kind: Option<NodeKind>,
    },

    /// Concentration at every node at one timestep
    Series {
        /// Injection node of the scenario
        #[arg(short, long)]
        injection: Option<String>,

        /// Timestep in seconds
        #[arg(short, long)]
        timestep: Timestep,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Concentration over time at one node
    History {
        /// Injection node of the scenario
        #[arg(short, long)]
        injection: Option<String>,

        /// Node to show the history of
        #[arg(long)]
        node: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Step through the scenario like the dashboard animation
    Play {
        /// Injection node of the scenario
        #[arg(short, long)]
        injection: Option<String>,

        /// Number of frames to play
        #[arg(short, long, default_value = "10")]
        frames: usize,

        /// Playback speed: slow, medium or fast
        #[arg(short, long)]
        speed: Option<Speed>,

        /// Do not wait between frames
        #[arg(long)]
        no_delay: bool,
    },

    /// Write a JSON summary of the network and scenarios to a file
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(root) = args.data_root {
        settings.data_root = root;
    }
    if args.network.is_some() {
        settings.network = args.network;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    debug!("Settings: {:?}", settings);

    match args.command {
        Command::Networks => list_networks(&settings.data_root),
        Command::Summary => {
            let (graph, store) = open_network(&settings)?;
            print_summary(&graph, &store);
            Ok(())
        }
        Command::Nodes { kind } => {
            let (graph, _) = open_network(&settings)?;
            print_nodes(&graph, kind)
        }
        Command::Series {
            injection,
            timestep,
            json,
        } => {
            let (_, store) = open_network(&settings)?;
            let mut session = Session::new(&store)?;
            if let Some(injection) = injection {
                session.select_injection(&injection)?;
            }
            if !store.time_axis().contains(timestep) {
                warn!(
                    "Timestep {} is not on the time axis ({}), every node reads as zero",
                    timestep,
                    store.time_axis()
                );
            }
            session.set_timestep(timestep);
            print_series(&session, json)
        }
        Command::History {
            injection,
            node,
            json,
        } => {
            let (_, store) = open_network(&settings)?;
            let mut session = Session::new(&store)?;
            if let Some(injection) = injection {
                session.select_injection(&injection)?;
            }
            session.select_history_node(Some(&node))?;
            print_history(&session, json)
        }
        Command::Play {
            injection,
            frames,
            speed,
            no_delay,
        } => {
            let (_, store) = open_network(&settings)?;
            let mut session = Session::new(&store)?;
            if let Some(injection) = injection {
                session.select_injection(&injection)?;
            }
            session.playback = Playback::new(speed.unwrap_or(settings.speed));
            play(&mut session, frames, no_delay);
            Ok(())
        }
        Command::Export { output } => {
            let (graph, store) = open_network(&settings)?;
            export_to_file(&graph, &store, &output)
        }
    }
}

/// Resolve the configured network, falling back to the first example.
fn network_name(settings: &Settings) -> Result<String> {
    if let Some(network) = &settings.network {
        return Ok(network.clone());
    }
    catalog::example_networks(&settings.data_root)?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No networks found in {}", settings.data_root.display()))
}

/// Load the network graph and its scenarios, checking they agree.
fn open_network(settings: &Settings) -> Result<(NetworkGraph, PollutionStore)> {
    let network = network_name(settings)?;
    let graph = NetworkGraph::load(&settings.data_root, &network)
        .with_context(|| format!("Failed to load network {}", network))?;
    let store = PollutionStore::load_network(&settings.data_root, &network)
        .with_context(|| format!("Failed to load pollution data for {}", network))?;
    store.validate_columns(&graph)?;
    Ok((graph, store))
}

fn list_networks(data_root: &Path) -> Result<()> {
    for name in catalog::example_networks(data_root)? {
        println!("{}", name);
    }
    for name in catalog::custom_networks(data_root)? {
        println!("{} (custom)", name);
    }
    Ok(())
}

fn print_summary(graph: &NetworkGraph, store: &PollutionStore) {
    let axis = store.time_axis();
    let range = store.range();
    let (lo, hi) = range.log_bounds();

    println!("Nodes:            {}", graph.nodes().len());
    println!("Edges:            {}", graph.edges().len());
    println!("Scenarios:        {}", store.len());
    println!("Default injection {}", store.default_injection());
    println!(
        "Time:             {} to {} every {}s",
        format_clock(axis.start),
        format_clock(axis.end),
        axis.step
    );
    println!("Max concentration {}", range.max);
    println!("Colour scale      {} to {} (log)", lo, hi);
}

fn print_nodes(graph: &NetworkGraph, kind: Option<NodeKind>) -> Result<()> {
    for node in graph.nodes() {
        if kind.is_some_and(|k| k != node.kind) {
            continue;
        }
        let elevation = node.elevation.map(|e| e.to_string()).unwrap_or_default();
        let demand = node.demand.map(|d| d.to_string()).unwrap_or_default();
        println!(
            "{}\t{}\t{}\t{}\t{}",
            node.name,
            node.kind,
            elevation,
            demand,
            graph.connected_description(&node.name)?
        );
    }
    Ok(())
}

fn print_series(session: &Session<'_>, json: bool) -> Result<()> {
    let series = session.series();
    if json {
        let map: serde_json::Map<String, serde_json::Value> = series
            .iter()
            .map(|(node, value)| (node.to_string(), serde_json::json!(value)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        for (node, value) in series.iter() {
            println!("{}\t{}", node, value);
        }
    }
    Ok(())
}

fn print_history(session: &Session<'_>, json: bool) -> Result<()> {
    let history = session.history()?;
    if json {
        let output = serde_json::json!({
            "injection": session.injection(),
            "node": session.history_node(),
            "points": history.points(),
            "range": history.chart_range(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (t, value) in history.points() {
            println!("{}\t{}", t, value);
        }
    }
    Ok(())
}

fn play(session: &mut Session<'_>, frames: usize, no_delay: bool) {
    session.playback.toggle();
    let interval = session.playback.speed.interval();
    for frame in 0..frames {
        if frame > 0 {
            if !no_delay {
                thread::sleep(interval);
            }
            session.tick();
        }
        let series = session.series();
        println!(
            "{:>8}  {}  max {:.6}",
            session.timestep(),
            format_clock(session.timestep()),
            series.max()
        );
    }
    session.playback.toggle();
}

/// Export network and scenario summary to a JSON file
fn export_to_file(graph: &NetworkGraph, store: &PollutionStore, output: &Path) -> Result<()> {
    let sizes = graph.node_sizes(8.0);
    let nodes: Vec<serde_json::Value> = graph
        .nodes()
        .iter()
        .zip(sizes)
        .map(|(node, size)| {
            serde_json::json!({
                "name": node.name,
                "type": node.kind.label(),
                "elevation": node.elevation,
                "demand": node.demand,
                "position": node.position,
                "connected": graph.connected_description(&node.name).unwrap_or_default(),
                "size": size,
            })
        })
        .collect();

    let export = serde_json::json!({
        "nodes": nodes,
        "edges": graph.edges(),
        "layout": graph.layout_bounds(),
        "injection_nodes": store.injection_nodes(),
        "default_injection": store.default_injection(),
        "time_axis": store.time_axis(),
        "concentration": store.range(),
    });

    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Exported network summary to: {}", output.display());
    Ok(())
}
