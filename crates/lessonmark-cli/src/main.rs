use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lessonmark_config::Config;
use lessonmark_engine::{FsSourceReader, Node, NodeKind, Pipeline};
use lessonmark_erd::ErdSchema;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "lessonmark", version, about = "Render lesson markdown and ER diagrams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a lesson and print the transformed tree as JSON
    Render {
        file: PathBuf,
        /// Directory code imports resolve against (defaults to the lesson's directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Config file to use instead of ~/.config/lessonmark/config.toml
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the id of every heading, one per line
    Slugs {
        file: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Lay out an ER schema (.toml or .json) and print it as JSON
    Erd {
        schema: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match Cli::parse().command {
        Command::Render {
            file,
            root,
            config,
            pretty,
        } => {
            let doc = render_file(&file, root, config.as_deref())?;
            print_json(&doc, pretty)
        }
        Command::Slugs { file, config } => {
            let doc = render_file(&file, None, config.as_deref())?;
            for id in heading_ids(&doc) {
                println!("{id}");
            }
            Ok(())
        }
        Command::Erd { schema, pretty } => {
            let schema = ErdSchema::load(&schema)
                .with_context(|| format!("failed to load ER schema {}", schema.display()))?;
            print_json(&lessonmark_erd::layout(&schema), pretty)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path)?
            .with_context(|| format!("config file {} not found", path.display())),
        None => {
            log::debug!("config path: {}", Config::config_path().display());
            Ok(Config::load()?.unwrap_or_default())
        }
    }
}

fn build_pipeline(config: &Config, source_root: PathBuf) -> Result<Pipeline> {
    let reader = FsSourceReader::new(source_root.clone())
        .with_context(|| format!("invalid source root {}", source_root.display()))?;
    let mut builder = Pipeline::builder()
        .source_reader(Arc::new(reader))
        .indent_unit(config.list.indent_unit)
        .tab_width(config.list.tab_width)
        .counter_prefix(config.list.counter_prefix.clone());
    if !config.passes.is_empty() {
        builder = builder.passes(config.passes.iter().cloned());
    }
    builder.build().context("invalid pass configuration")
}

fn render_file(file: &Path, root: Option<PathBuf>, config_path: Option<&Path>) -> Result<Node> {
    let config = load_config(config_path)?;
    let source_root = root
        .or_else(|| config.source_root.clone())
        .unwrap_or_else(|| lesson_dir(file));
    let pipeline = build_pipeline(&config, source_root)?;

    let markdown = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    log::info!("rendering {} with {:?}", file.display(), pipeline.kinds());
    Ok(pipeline.render(&markdown))
}

fn lesson_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn heading_ids(doc: &Node) -> Vec<String> {
    let mut ids = Vec::new();
    doc.visit(&mut |node| {
        if let NodeKind::Heading { id: Some(id), .. } = &node.kind {
            ids.push(id.clone());
        }
    });
    ids
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
