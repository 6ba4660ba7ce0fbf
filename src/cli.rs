use crate::config::{Config, EdgePolicy, Placement, load_config};
use crate::encode::to_data_uri;
use crate::ir::Graph;
use crate::layout::{IdSource, RandomIds, SequentialIds, compute_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::render::{render_svg, write_output_png, write_output_text};
use crate::theme::Theme;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "chronos-viz",
    version,
    about = "Render a node/edge graph as a layered SVG diagram"
)]
pub struct Args {
    /// Input graph (.json or .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (theme, themeVariables, layout)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Color preset, overrides the config file theme
    #[arg(short = 't', long = "theme", value_enum)]
    pub theme: Option<ThemeName>,

    /// Reject edges and roots that reference unknown nodes
    #[arg(long = "strict")]
    pub strict: bool,

    /// Pack nodes by width instead of using equal slots
    #[arg(long = "packed")]
    pub packed: bool,

    /// Seed for random edge/diagram ids (sequential ids when omitted)
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    DataUri,
    LayoutJson,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Midnight,
    Light,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = build_config(&args)?;
    let graph = read_graph(args.input.as_deref())?;

    let mut ids: Box<dyn IdSource> = match args.seed {
        Some(seed) => Box::new(RandomIds::seeded(seed)),
        None => Box::new(SequentialIds::new()),
    };
    let layout = compute_layout(&graph, &config.layout, ids.as_mut())?;
    tracing::info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        layers = layout.layer_count,
        "layout ready"
    );

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_text(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_png(&svg, &output, &config.layout, &config.theme)?;
        }
        OutputFormat::DataUri => {
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_text(&to_data_uri(&svg), args.output.as_deref())?;
        }
        OutputFormat::LayoutJson => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout)?,
            None => write_output_text(&LayoutDump::from_layout(&layout).to_json()?, None)?,
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "chronos_viz=debug"
    } else {
        "chronos_viz=warn"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(theme) = args.theme {
        config.theme = match theme {
            ThemeName::Midnight => Theme::midnight(),
            ThemeName::Light => Theme::light(),
        };
    }
    if let Some(width) = args.width {
        config.layout.width = width;
    }
    if let Some(height) = args.height {
        config.layout.height = height;
    }
    if args.strict {
        config.layout.edge_policy = EdgePolicy::Strict;
    }
    if args.packed {
        config.layout.placement = Placement::Packed;
    }
    Ok(config)
}

fn read_graph(path: Option<&Path>) -> Result<Graph> {
    if let Some(path) = path {
        if path != Path::new("-") {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading graph {}", path.display()))?;
            let is_json5 = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("json5"))
                .unwrap_or(false);
            return parse_graph(&content, is_json5)
                .with_context(|| format!("parsing graph {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    parse_graph(&buf, false).context("parsing graph from stdin")
}

/// Strict JSON first; JSON5 when asked for or when plain JSON fails.
fn parse_graph(input: &str, json5_first: bool) -> Result<Graph> {
    if json5_first {
        return Ok(Graph::from_json5(input)?);
    }
    match Graph::from_json(input) {
        Ok(graph) => Ok(graph),
        Err(json_err) => Graph::from_json5(input).map_err(|_| json_err.into()),
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
