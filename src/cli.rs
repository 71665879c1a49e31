//! Command line surface over a JSON file map.
//!
//! The map is read from disk, driven through an [`Explorer`] backed by a
//! [`MemStore`], and written back only by the mutating commands.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::backends::MemStore;
use crate::config::ExplorerConfig;
use crate::explorer::Explorer;
use crate::store::FileStore;
use crate::tree::TreeNode;
use crate::types::FileMap;

#[derive(Parser, Debug)]
#[command(name = "sandtree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and edit a sandbox file map stored as JSON")]
pub struct Args {
    /// JSON file map: { "/path": { "code": "..." } }
    #[arg(long, short, value_name = "FILE")]
    pub files: PathBuf,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the directory tree
    Tree {
        /// Emit the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move a file or folder into a folder
    Mv { source: String, dest_dir: String },
    /// Copy a file or folder into a folder
    Cp { source: String, dest_dir: String },
    /// Delete a file or folder
    Rm { path: String },
    /// Rename a file or folder in place
    Rename { path: String, new_name: String },
    /// Create a file
    Touch {
        path: String,
        #[arg(long, default_value = "")]
        code: String,
    },
    /// Create a folder
    Mkdir { path: String },
}

impl Args {
    pub fn load_config(&self) -> anyhow::Result<ExplorerConfig> {
        match &self.config {
            Some(path) => ExplorerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(ExplorerConfig::default()),
        }
    }
}

/// Run one command and return what should be printed on stdout.
pub async fn run(args: &Args, config: ExplorerConfig) -> anyhow::Result<String> {
    let files = read_files(&args.files)?;
    let mut explorer = Explorer::with_config(MemStore::with_files(files), config);

    let outcome = match &args.command {
        Command::Tree { json } => {
            let tree = explorer.tree().await?;
            for conflict in &tree.conflicts {
                eprintln!("conflict: {}", serde_json::to_string(conflict)?);
            }
            return if *json {
                Ok(serde_json::to_string_pretty(&tree)?)
            } else {
                Ok(render_tree(&tree.root))
            };
        }
        Command::Mv { source, dest_dir } => explorer.move_into(source, dest_dir).await,
        Command::Cp { source, dest_dir } => explorer.copy_into(source, dest_dir).await,
        Command::Rm { path } => explorer
            .delete(path)
            .await
            .map(|n| format!("{} removed", n)),
        Command::Rename { path, new_name } => explorer.rename(path, new_name).await,
        Command::Touch { path, code } => explorer.create_file(path, code).await,
        Command::Mkdir { path } => explorer.create_folder(path).await,
    };

    for notice in explorer.notices() {
        eprintln!("{:?}: {}", notice.level, notice.message);
    }
    let result = outcome?;

    let updated = explorer.store().read().await?;
    write_files(&args.files, &updated)?;
    Ok(result)
}

pub fn read_files(path: &Path) -> anyhow::Result<FileMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn write_files(path: &Path, files: &FileMap) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(files)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

/// Indented listing, folders first, folder names suffixed with `/`.
pub fn render_tree(root: &TreeNode) -> String {
    let mut out = String::new();
    render_node(root, 0, &mut out);
    out
}

fn render_node(node: &TreeNode, depth: usize, out: &mut String) {
    for child in node.sorted_children() {
        let marker = if child.is_folder() { "/" } else { "" };
        let _ = writeln!(out, "{}{}{}", "  ".repeat(depth), child.name, marker);
        render_node(child, depth + 1, out);
    }
}
