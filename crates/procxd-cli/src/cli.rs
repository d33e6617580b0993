//! Command-line interface for the procxd utility
//!
//! Turns configuration files, graphs and trees into `.excalidraw` sketches.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use procxd::core::logging::init_logging;
use procxd::layout::{
    render_comparative_stack_sketch, render_graph, render_nested_stack_sketch, render_stack_sketch,
    render_tree, CircularLayout, FixedLayout, SpringLayout, TreeLayoutAlgorithm, TreeLayoutConfig,
    TreeOrientation,
};
use procxd::sketch::{ColorTechnique, SketchBuilder, SketchConfig};
use procxd::{CoordinateAssigner, GraphDatabase, LabelTree, Stacking};

/// procxd - Procedurally generate Excalidraw sketches
#[derive(Parser)]
#[command(name = "procxd")]
#[command(about = "Generate Excalidraw sketches from configurations, graphs and trees")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error); defaults to PROCXD_LOG_LEVEL, RUST_LOG, then info
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json); defaults to PROCXD_LOG_FORMAT, then compact
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Options shared by every drawing command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SketchArgs {
    /// Output file (`.excalidraw` is appended when missing)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for ids and colours; the same seed produces the same file
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pick box colours from the fixed palette instead of sampling them
    #[arg(long)]
    pub palette: bool,
}

impl SketchArgs {
    fn sketch_config(&self) -> SketchConfig {
        SketchConfig {
            seed: self.seed,
            color_technique: if self.palette {
                ColorTechnique::Palette
            } else {
                ColorTechnique::Sampled
            },
            ..SketchConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw a JSON or YAML configuration as a stack of boxes
    Stack {
        /// Configuration file (.json, .yaml or .yml)
        input: PathBuf,

        /// Title of the sketch; defaults to the file stem
        #[arg(long)]
        name: Option<String>,

        /// Draw mappings as nested boxes instead of an indented stack
        #[arg(long)]
        nested: bool,

        /// Direction of sibling boxes in the nested sketch
        #[arg(long, value_enum, default_value_t = StackingChoice::Horizontal)]
        stacking: StackingChoice,

        #[command(flatten)]
        sketch: SketchArgs,
    },

    /// Draw two configurations side by side with their differences highlighted
    Compare {
        /// Base configuration
        left: PathBuf,

        /// Configuration compared against the base
        right: PathBuf,

        #[command(flatten)]
        sketch: SketchArgs,
    },

    /// Draw a graph described in JSON
    Graph {
        /// Graph file: {"directed": bool, "nodes": [..], "edges": [{"from", "to", "type"?}]}
        input: PathBuf,

        /// How node coordinates are computed
        #[arg(long, value_enum, default_value_t = LayoutChoice::Spring)]
        layout: LayoutChoice,

        /// Iterations of the spring layout
        #[arg(long, default_value_t = 100)]
        iterations: usize,

        #[command(flatten)]
        sketch: SketchArgs,
    },

    /// Draw a tree described in JSON as {"label": .., "children": [..]}
    Tree {
        /// Tree file
        input: PathBuf,

        /// Tree orientation
        #[arg(long, value_enum, default_value_t = OrientationChoice::TopDown)]
        orientation: OrientationChoice,

        #[command(flatten)]
        sketch: SketchArgs,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum StackingChoice {
    #[default]
    Horizontal,
    Vertical,
}

impl From<StackingChoice> for Stacking {
    fn from(value: StackingChoice) -> Self {
        match value {
            StackingChoice::Horizontal => Stacking::Horizontal,
            StackingChoice::Vertical => Stacking::Vertical,
        }
    }
}

/// Coordinate assigners for graphs
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum LayoutChoice {
    /// Nodes evenly spaced on a circle
    Circular,
    /// Force-directed placement
    #[default]
    Spring,
    /// Coordinates given in the file as x and y
    Fixed,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OrientationChoice {
    #[default]
    TopDown,
    Indented,
}

impl From<OrientationChoice> for TreeOrientation {
    fn from(value: OrientationChoice) -> Self {
        match value {
            OrientationChoice::TopDown => TreeOrientation::TopDown,
            OrientationChoice::Indented => TreeOrientation::Indented,
        }
    }
}

/// Main CLI application
#[derive(Default)]
pub struct ProcxdApp;

impl ProcxdApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        let level = cli
            .log_level
            .map(|l| l.as_str())
            .or(if cli.verbose { Some("debug") } else { None });
        if let Err(e) = init_logging(level, cli.log_format.map(|f| f.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("procxd v{}", env!("CARGO_PKG_VERSION"));
        }

        let written = match cli.command {
            Commands::Stack {
                input,
                name,
                nested,
                stacking,
                sketch,
            } => self.stack_command(&input, name, nested, stacking.into(), &sketch)?,
            Commands::Compare {
                left,
                right,
                sketch,
            } => self.compare_command(&left, &right, &sketch)?,
            Commands::Graph {
                input,
                layout,
                iterations,
                sketch,
            } => self.graph_command(&input, layout, iterations, &sketch)?,
            Commands::Tree {
                input,
                orientation,
                sketch,
            } => self.tree_command(&input, orientation.into(), &sketch)?,
        };

        if cli.verbose {
            eprintln!("Wrote {}", written.display());
        }
        println!("{}", written.display());
        Ok(())
    }

    /// Handle the stack command
    pub fn stack_command(
        &self,
        input: &Path,
        name: Option<String>,
        nested: bool,
        stacking: Stacking,
        args: &SketchArgs,
    ) -> Result<PathBuf> {
        let config = read_document(input)?;
        let name = name.unwrap_or_else(|| file_stem(input));
        let mut builder = SketchBuilder::with_config(args.sketch_config());
        let drawn = if nested {
            render_nested_stack_sketch(&mut builder, &config, stacking, &name).map(|s| s.boxes.len())
        } else {
            render_stack_sketch(&mut builder, &config, &name).map(|s| s.rows.len())
        };
        let boxes = drawn.with_context(|| format!("Failed to draw configuration '{}'", input.display()))?;
        debug!(boxes, nested, "Configuration drawn");
        self.export(&builder, args, input)
    }

    /// Handle the compare command
    pub fn compare_command(&self, left: &Path, right: &Path, args: &SketchArgs) -> Result<PathBuf> {
        let left_config = read_document(left)?;
        let right_config = read_document(right)?;
        let mut builder = SketchBuilder::with_config(args.sketch_config());
        let sketch = render_comparative_stack_sketch(
            &mut builder,
            &left_config,
            &right_config,
            &file_stem(left),
            &file_stem(right),
        )
        .with_context(|| format!("Failed to compare '{}' with '{}'", left.display(), right.display()))?;
        info!(
            differences = sketch.differences().count(),
            rows = sketch.rows.len(),
            "Configurations compared"
        );

        let default = left.with_file_name(format!("{}_vs_{}", file_stem(left), file_stem(right)));
        self.export(&builder, args, &default)
    }

    /// Handle the graph command
    pub fn graph_command(
        &self,
        input: &Path,
        layout: LayoutChoice,
        iterations: usize,
        args: &SketchArgs,
    ) -> Result<PathBuf> {
        let document = read_document(input)?;
        let graph = GraphDatabase::from_json(document)
            .with_context(|| format!("Invalid graph in '{}'", input.display()))?;

        let assigner: Box<dyn CoordinateAssigner<GraphDatabase>> = match layout {
            LayoutChoice::Circular => Box::new(CircularLayout),
            LayoutChoice::Fixed => Box::new(FixedLayout),
            LayoutChoice::Spring => {
                let mut spring = SpringLayout::new().with_iterations(iterations);
                spring.seed = args.seed;
                Box::new(spring)
            }
        };
        debug!(layout = assigner.name(), "Selected graph layout");

        let mut builder = SketchBuilder::with_config(args.sketch_config());
        render_graph(&mut builder, &graph, assigner.as_ref())
            .with_context(|| format!("Failed to draw graph '{}'", input.display()))?;
        self.export(&builder, args, input)
    }

    /// Handle the tree command
    pub fn tree_command(
        &self,
        input: &Path,
        orientation: TreeOrientation,
        args: &SketchArgs,
    ) -> Result<PathBuf> {
        let document = read_document(input)?;
        let tree: LabelTree = serde_json::from_value(document)
            .with_context(|| format!("Invalid tree in '{}'", input.display()))?;

        let algorithm = TreeLayoutAlgorithm::with_config(TreeLayoutConfig {
            orientation,
            ..TreeLayoutConfig::default()
        });
        let mut builder = SketchBuilder::with_config(args.sketch_config());
        render_tree(&mut builder, &tree, &algorithm)
            .with_context(|| format!("Failed to draw tree '{}'", input.display()))?;
        self.export(&builder, args, input)
    }

    fn export(&self, builder: &SketchBuilder, args: &SketchArgs, input: &Path) -> Result<PathBuf> {
        let target = args
            .output
            .clone()
            .unwrap_or_else(|| input.with_extension(""));
        builder
            .export_to_file(&target)
            .with_context(|| format!("Failed to write sketch '{}'", target.display()))
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string())
}

/// Read a JSON or YAML file into a JSON value.
///
/// `.yaml` and `.yml` files are parsed as YAML, everything else as JSON
/// with YAML as a fallback.
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
    parse_document(path, &content)
}

pub fn parse_document(path: &Path, content: &str) -> Result<serde_json::Value> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        return serde_yaml::from_str(content)
            .with_context(|| format!("Invalid YAML in '{}'", path.display()));
    }
    match serde_json::from_str(content) {
        Ok(value) => Ok(value),
        Err(json_error) => serde_yaml::from_str(content).map_err(|_| {
            anyhow!("Invalid JSON in '{}': {}", path.display(), json_error)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing_stack_command() {
        let args = vec![
            "procxd", "stack", "cfg.yaml", "--nested", "--stacking", "vertical", "--seed", "7", "-o",
            "out",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Stack {
                input,
                name,
                nested,
                stacking,
                sketch,
            } => {
                assert_eq!(input.to_string_lossy(), "cfg.yaml");
                assert!(name.is_none());
                assert!(nested);
                assert_eq!(stacking, StackingChoice::Vertical);
                assert_eq!(sketch.seed, Some(7));
                assert_eq!(sketch.output.unwrap().to_string_lossy(), "out");
            }
            _ => panic!("Expected Stack command"),
        }
    }

    #[test]
    fn test_cli_parsing_graph_defaults() {
        let cli = Cli::try_parse_from(["procxd", "graph", "g.json"]).unwrap();
        match cli.command {
            Commands::Graph {
                layout, iterations, ..
            } => {
                assert_eq!(layout, LayoutChoice::Spring);
                assert_eq!(iterations, 100);
            }
            _ => panic!("Expected Graph command"),
        }
        assert!(cli.log_level.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parsing_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "procxd",
            "tree",
            "t.json",
            "--orientation",
            "indented",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        match cli.command {
            Commands::Tree { orientation, .. } => assert_eq!(orientation, OrientationChoice::Indented),
            _ => panic!("Expected Tree command"),
        }
    }

    #[test]
    fn test_cli_compare_needs_two_files() {
        assert!(Cli::try_parse_from(["procxd", "compare", "only.json"]).is_err());
    }

    #[test]
    fn test_parse_document_yaml_and_json() {
        let yaml = parse_document(Path::new("c.yml"), "a: 1\nb:\n  c: text\n").unwrap();
        assert_eq!(yaml["b"]["c"], "text");
        let json = parse_document(Path::new("c.json"), r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(json["a"][1], 2);
        // unknown extensions fall back to YAML
        let fallback = parse_document(Path::new("c.cfg"), "key: value").unwrap();
        assert_eq!(fallback["key"], "value");
    }

    #[test]
    fn test_parse_document_error_names_file() {
        let err = parse_document(Path::new("broken.yaml"), "a: [1, 2").unwrap_err();
        assert!(format!("{:#}", err).contains("broken.yaml"));
    }

    #[test]
    fn test_stack_command_writes_sketch() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("train.yaml");
        fs::write(&input, "model:\n  layers: 4\nlr: 0.1\n").unwrap();

        let app = ProcxdApp::new();
        let args = SketchArgs {
            seed: Some(1),
            ..SketchArgs::default()
        };
        let written = app
            .stack_command(&input, None, false, Stacking::Horizontal, &args)
            .unwrap();
        assert_eq!(written, dir.path().join("train.excalidraw"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
        let texts: Vec<&str> = value["elements"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["text"].as_str())
            .collect();
        assert!(texts.contains(&"train"));
        assert!(texts.contains(&"layers = 4"));
    }

    #[test]
    fn test_nested_stack_command() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cfg.json");
        fs::write(&input, r#"{"a": {"b": 1}, "c": {"d": 2}}"#).unwrap();
        let args = SketchArgs {
            output: Some(dir.path().join("nested")),
            seed: Some(2),
            palette: true,
        };
        let written = ProcxdApp::new()
            .stack_command(&input, Some("run".into()), true, Stacking::Vertical, &args)
            .unwrap();
        assert_eq!(written, dir.path().join("nested.excalidraw"));
        assert!(written.exists());
    }

    #[test]
    fn test_compare_command() {
        let dir = tempdir().unwrap();
        let left = dir.path().join("old.json");
        let right = dir.path().join("new.yaml");
        fs::write(&left, r#"{"a": 1, "b": 2}"#).unwrap();
        fs::write(&right, "a: 1\nb: 3\n").unwrap();

        let written = ProcxdApp::new()
            .compare_command(&left, &right, &SketchArgs::default())
            .unwrap();
        assert_eq!(written, dir.path().join("old_vs_new.excalidraw"));
    }

    #[test]
    fn test_graph_command_layouts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("graph.json");
        fs::write(
            &input,
            r#"{"nodes": [{"id": "a", "x": 0, "y": 0}, {"id": "b", "x": 1, "y": 1}],
                "edges": [{"from": "a", "to": "b"}]}"#,
        )
        .unwrap();
        let app = ProcxdApp::new();
        for layout in [LayoutChoice::Circular, LayoutChoice::Spring, LayoutChoice::Fixed] {
            let args = SketchArgs {
                output: Some(dir.path().join(format!("{:?}", layout))),
                seed: Some(3),
                palette: false,
            };
            let written = app.graph_command(&input, layout, 50, &args).unwrap();
            assert!(written.exists());
        }
    }

    #[test]
    fn test_graph_command_rejects_unknown_edge_endpoint() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.json");
        fs::write(&input, r#"{"nodes": ["a"], "edges": [{"from": "a", "to": "zz"}]}"#).unwrap();
        let err = ProcxdApp::new()
            .graph_command(&input, LayoutChoice::Circular, 10, &SketchArgs::default())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("bad.json"));
    }

    #[test]
    fn test_tree_command() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("tree.json");
        fs::write(
            &input,
            r#"{"label": "A", "children": [{"label": "B"}, {"label": "C", "children": [{"label": "D"}]}]}"#,
        )
        .unwrap();
        let written = ProcxdApp::new()
            .tree_command(&input, TreeOrientation::TopDown, &SketchArgs::default())
            .unwrap();
        assert!(written.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_document(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read input file"));
    }
}
