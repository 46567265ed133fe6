//! CLI for replaying change-tracking scenarios and exercising the
//! reference collaborators against JSON-described trees

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xml_engine_traits::{DocumentLoader, ExtendedTransformEngine, SchemaValidator};
use xml_test_harness::{
    ContentModel, ContentModelValidator, FeedListTransform, JsonLoader, ScenarioName,
};
use xml_tree::{Fixed, Tree};

#[derive(Parser)]
#[command(name = "xml-test-cli", version, about = "Change-tracked XML tree playground")]
struct Cli {
    /// Log filter, e.g. `debug` or `xml_tree=trace`; overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available scenarios
    List,
    /// Run a scenario and print its notification trace
    Run {
        scenario: ScenarioName,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Load a JSON tree description and print it as XML
    Show {
        file: PathBuf,
        /// Also print the location of every node
        #[arg(long)]
        paths: bool,
    },
    /// Validate a document against a JSON content model
    Validate {
        document: PathBuf,
        model: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Turn the items of a feed into an HTML list
    Transform {
        feed: PathBuf,
        #[arg(long, default_value_t = 5)]
        take: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Markdown,
    Json,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(tree: &mut Tree, path: &Path) -> Result<xml_tree::Node> {
    JsonLoader::new()
        .load_file(tree, path)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn list() {
    for name in ScenarioName::all() {
        println!("{:<20} {}", name.to_string(), name.description());
    }
}

fn run(scenario: ScenarioName, format: Format) -> Result<()> {
    let report = scenario.run()?.into_report();
    match format {
        Format::Text => print!("{}", report.to_text()),
        Format::Markdown => print!("{}", report.to_markdown()),
        Format::Json => println!("{}", report.to_json()),
    }
    Ok(())
}

fn show(file: &Path, paths: bool) -> Result<()> {
    let mut tree = Tree::new();
    let root = load(&mut tree, file)?;
    println!("{}", tree.to_xml(root));
    if paths {
        for node in tree.descendants_and_self(root) {
            println!("{}", tree.path(node));
            for &attr in tree.attributes(node) {
                println!("{}", tree.path(attr));
            }
        }
    }
    Ok(())
}

fn validate(document: &Path, model: &Path, format: Format) -> Result<()> {
    let mut tree = Tree::new();
    let root = load(&mut tree, document)?;
    let source = std::fs::read_to_string(model)
        .with_context(|| format!("failed to read {}", model.display()))?;
    let model = ContentModel::from_json(&source)?;

    let report = ContentModelValidator::new(model).validate(&tree, &root)?;
    tree.apply_schema_info(root, &report);

    let mut located = Vec::new();
    for node in tree.descendants_and_self(root) {
        if !tree.is_element(node) {
            continue;
        }
        for n in std::iter::once(node).chain(tree.attributes(node).iter().copied()) {
            let validity = tree.schema_info(n).map(|info| info.validity.to_string());
            located.push((tree.path(n), validity));
        }
    }

    match format {
        Format::Json => {
            let nodes: Vec<_> = located
                .iter()
                .map(|(path, validity)| serde_json::json!({ "path": path, "validity": validity }))
                .collect();
            let out = serde_json::json!({
                "valid": report.valid,
                "nodes": nodes,
                "errors": report.errors,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Text | Format::Markdown => {
            for (path, validity) in &located {
                println!("{} - {}", path, validity.as_deref().unwrap_or("null"));
            }
            for error in &report.errors {
                println!(
                    "Error: ({}) => {}",
                    error.path.as_deref().unwrap_or("?"),
                    error.message
                );
            }
        }
    }
    debug!(valid = report.valid, "validation finished");
    if !report.valid {
        bail!("document is not valid");
    }
    Ok(())
}

fn transform(feed: &Path, take: usize) -> Result<()> {
    let mut tree = Tree::new();
    let root = load(&mut tree, feed)?;
    let stylesheet = tree.build(&Fixed::element("feed-list").attr("take", take.to_string()))?;
    let html = FeedListTransform::new().transform_to_string(&tree, &stylesheet, &tree, &root)?;
    println!("{}", html);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match &cli.command {
        Command::List => list(),
        Command::Run { scenario, format } => run(*scenario, *format)?,
        Command::Show { file, paths } => show(file, *paths)?,
        Command::Validate {
            document,
            model,
            format,
        } => validate(document, model, *format)?,
        Command::Transform { feed, take } => transform(feed, *take)?,
    }
    Ok(())
}
