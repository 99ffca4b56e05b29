use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vendormap::engine::Viewport;
use vendormap::palette::Palette;
use vendormap::style::{link_style, node_fill, node_style};
use vendormap::{Engine, FilterChange, ForceParameters, Phase, RawDataset, load};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph dataset: JSON with node and link tables.
    #[arg(long)]
    dataset: PathBuf,

    /// Stop after this many ticks even if the layout has not settled.
    #[arg(long, default_value_t = 1000)]
    ticks: usize,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 900.0)]
    width: f32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Constrain the view to one state before reporting.
    #[arg(long)]
    state: Option<String>,

    /// Constrain the view to one city.
    #[arg(long)]
    city: Option<String>,

    /// Constrain the view to one region.
    #[arg(long)]
    region: Option<String>,

    /// Constrain the view to one vendor.
    #[arg(long)]
    vendor: Option<String>,

    /// Constrain the view to one node type.
    #[arg(long = "type")]
    kind: Option<String>,

    /// How many visible nodes to list in the summary.
    #[arg(long, default_value_t = 10)]
    summary_limit: usize,

    /// Verbose engine logging.
    #[arg(long)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("vendormap=debug")
    } else {
        EnvFilter::new("vendormap=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let file = File::open(&args.dataset)
        .with_context(|| format!("failed to open dataset {}", args.dataset.display()))?;
    let raw = RawDataset::from_reader(BufReader::new(file)).context("failed to parse dataset")?;
    let store = load(raw).context("failed to load graph dataset")?;
    info!(
        "simulating {} nodes / {} links",
        store.node_count(),
        store.edge_count()
    );

    let mut engine = Engine::new(
        store,
        ForceParameters::default(),
        Viewport::new(args.width, args.height),
    );

    let constraints = [
        args.state.map(FilterChange::State),
        args.city.map(FilterChange::City),
        args.region.map(FilterChange::Region),
        args.vendor.map(FilterChange::Vendor),
        args.kind.map(FilterChange::Kind),
    ];
    for change in constraints.into_iter().flatten() {
        engine.on_filter_change(change);
    }

    let mut ticks = 0_usize;
    while engine.phase() == Phase::Running && ticks < args.ticks {
        engine.step();
        ticks += 1;
    }
    match engine.phase() {
        Phase::Settled => info!("layout settled after {ticks} ticks"),
        _ => info!(
            "layout still warm after {ticks} ticks (alpha {:.4})",
            engine.alpha()
        ),
    }

    let visibility = engine.visibility();
    let visible_nodes = visibility.nodes.iter().filter(|&&shown| shown).count();
    let visible_edges = visibility.edges.iter().filter(|&&shown| shown).count();
    println!(
        "{visible_nodes} of {} nodes and {visible_edges} of {} links visible",
        engine.store().node_count(),
        engine.store().edge_count()
    );

    let nodes = node_style(engine.parameters());
    let links = link_style(engine.parameters());
    println!(
        "node style: radius {:.1}, outline {} at {:.1}px; link style: {:.1}px at {:.0}% opacity",
        nodes.radius,
        nodes.outline,
        nodes.outline_width,
        links.width,
        links.opacity * 100.0
    );

    let palette = Palette::default();
    let listed = engine
        .nodes()
        .iter()
        .zip(&visibility.nodes)
        .filter(|&(_, &shown)| shown)
        .take(args.summary_limit);
    for (node, _) in listed {
        println!(
            "  {} [{}/{}/{}] {} {} at ({:.1}, {:.1}) fill {}",
            node.id,
            node.state,
            node.city,
            node.region,
            node.vendor,
            node.kind,
            node.position.x,
            node.position.y,
            node_fill(&palette, node)
        );
    }

    Ok(())
}
