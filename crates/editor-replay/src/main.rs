//! Editor Replay - drive the workflow editor from the command line
//!
//! Loads a workflow tree, runs a JSON array of editor commands against it
//! and prints the resulting tree:
//!
//! ```text
//! editor-replay --workflow flow.json --commands script.json --lang zh-CN
//! ```
//!
//! Set `RUST_LOG=debug` to see every dispatched action.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use workflow_editor::{
    EditorCommand, EditorConfig, EditorEvent, EditorStore, MaterialRegistry, VecEventSink,
};

// Linked for its `inventory` registrations
use editor_materials as _;

/// Replay editor commands against a workflow
#[derive(Parser)]
#[command(name = "editor-replay")]
#[command(author, version, about = "Replay editor commands against a workflow tree")]
struct Cli {
    /// Workflow JSON file (starts from a bare start node if omitted)
    #[arg(short, long)]
    workflow: Option<PathBuf>,

    /// JSON file holding an array of commands
    #[arg(short, long)]
    commands: PathBuf,

    /// Editor config JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config's language
    #[arg(short, long)]
    lang: Option<String>,

    /// Keep going when a command fails
    #[arg(long)]
    keep_going: bool,

    /// Print change events as they happen
    #[arg(long)]
    events: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<EditorConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)?,
        None => EditorConfig::default(),
    };
    if let Some(lang) = &cli.lang {
        config = config.with_lang(lang.clone());
    }
    Ok(config)
}

fn load_commands(path: &Path) -> Result<Vec<EditorCommand>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Replay the script and return the final tree as JSON
fn run(cli: &Cli) -> Result<String, Box<dyn Error>> {
    let config = load_config(cli)?;
    let commands = load_commands(&cli.commands)?;
    let sink = std::sync::Arc::new(VecEventSink::new());

    let mut store = EditorStore::builder()
        .config(config)
        .materials(MaterialRegistry::with_builtins())
        .event_sink(sink.clone())
        .build()?;

    match &cli.workflow {
        Some(path) => store.import_json(&fs::read_to_string(path)?)?,
        None => {
            let start = store.materials().create_node("start", store.locales())?;
            store.set_start_node(Some(start))?;
        }
    }
    sink.clear();

    log::info!("Replaying {} command(s)", commands.len());
    for (index, command) in commands.into_iter().enumerate() {
        log::debug!("#{} {:?}", index, command);
        if let Err(e) = store.apply(command) {
            if !cli.keep_going {
                return Err(format!("command #{} failed: {}", index, e).into());
            }
            log::warn!("Command #{} failed: {}", index, e);
        }
        if cli.events {
            for event in sink.events() {
                eprintln!("{}", describe(&event));
            }
        }
        sink.clear();
    }

    log::info!(
        "Done: {} undo / {} redo snapshot(s)",
        store.undo_list().len(),
        store.redo_list().len()
    );
    Ok(store.export_json()?)
}

fn describe(event: &EditorEvent) -> String {
    match event {
        EditorEvent::StartNodeChanged { start_node } => format!(
            "tree changed (root: {})",
            start_node.as_ref().map_or("none", |n| n.id.as_str())
        ),
        EditorEvent::SelectionChanged { selected_id } => {
            format!("selection: {}", selected_id.as_deref().unwrap_or("none"))
        }
        EditorEvent::HistoryChanged {
            undo_depth,
            redo_depth,
        } => format!("history: {} undo / {} redo", undo_depth, redo_depth),
    }
}
