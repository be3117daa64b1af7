//! Inspection tool for definition files.
//!
//! Loads a data directory through the full resolution pipeline and lets you
//! poke at the result: enumerate instances, dump one object, clone a
//! template, query faction sentiment. Diagnostic glue, not gameplay.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use codex_content::{World, WorldLoader};
use codex_core::ObjectClass;

/// Inspect resolved Revengate definition files
#[derive(Parser)]
#[command(name = "codex")]
#[command(about = "Inspection tool for Revengate definition files", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory of definition files to load
    #[arg(long, env = "CODEX_DATA_DIR", default_value = "crates/codex/content/data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List registered instances, optionally filtered by class
    List {
        /// Class name to filter by (e.g. FactionTag)
        class: Option<String>,
    },

    /// Show one registered instance in full
    Show {
        /// Instance id
        id: String,
    },

    /// Materialize a fresh clone of a template
    Invoke {
        /// Template id
        template_id: String,
    },

    /// Query the sentiment between two factions
    Sentiment {
        /// Faction tag name
        a: String,
        /// Faction tag name
        b: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let world = load_world(&cli.data_dir)?;

    match cli.command {
        Command::List { class } => list(&world, class.as_deref())?,
        Command::Show { id } => show(&world, &id)?,
        Command::Invoke { template_id } => invoke(&world, &template_id)?,
        Command::Sentiment { a, b } => {
            println!("{}", world.sentiment(&a, &b));
        }
    }
    Ok(())
}

fn load_world(data_dir: &PathBuf) -> Result<World> {
    let mut loader = WorldLoader::new();
    loader
        .load_dir(data_dir)
        .with_context(|| format!("loading definitions from {}", data_dir.display()))?;
    let world = loader.build().context("resolving the object graph")?;
    tracing::info!("{} singletons registered", world.len());
    Ok(world)
}

fn list(world: &World, class: Option<&str>) -> Result<()> {
    match class {
        Some(name) => {
            let class = ObjectClass::from_str(name)
                .map_err(|_| anyhow::anyhow!("unknown class `{name}`"))?;
            for object in world.instances_of_class(class) {
                println!("{object}");
            }
        }
        None => {
            for object in world.objects() {
                println!("{object}");
            }
        }
    }
    Ok(())
}

fn show(world: &World, id: &str) -> Result<()> {
    let object = world
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("no registered instance `{id}`"))?;
    println!("{object:#?}");
    Ok(())
}

fn invoke(world: &World, template_id: &str) -> Result<()> {
    let clone = world
        .invoke(template_id)
        .with_context(|| format!("invoking template `{template_id}`"))?;
    println!("{clone:#?}");
    Ok(())
}
