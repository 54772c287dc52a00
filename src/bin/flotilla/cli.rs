//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use flotilla::util::ColorChoice;

/// Flotilla - resolve, clone and wire together a constellation of git repositories
#[derive(Parser)]
#[command(name = "flotilla")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring of the output: auto, always or never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print machine-readable JSON events on stdout
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone every repository reachable from the root and generate projects
    Init,

    /// Generate projects for the repositories already checked out
    MakeProjects,

    /// Show the state of every repository
    Status,

    /// Pull every repository
    Pull,

    /// Push commits and tags of every repository
    Push,

    /// Create a tag in every repository
    Tag(TagArgs),

    /// Check out a branch or tag in every repository
    Checkout(CheckoutArgs),

    /// Commit all changes in every dirty repository
    Commit(CommitArgs),

    /// Display the dependency tree
    Tree(TreeArgs),

    /// List the repositories of an organization
    Discover(DiscoverArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct TagArgs {
    /// Tag to create
    pub value: String,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct CheckoutArgs {
    /// Tag to check out
    #[arg(long)]
    pub tag: Option<String>,

    /// Branch to check out
    #[arg(long)]
    pub branch: Option<String>,
}

#[derive(Args)]
pub struct CommitArgs {
    /// Commit message
    pub message: String,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Maximum depth to display
    #[arg(long)]
    pub depth: Option<usize>,

    /// Show duplicate repositories
    #[arg(long)]
    pub duplicates: bool,
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// Organization to list (defaults to the root's organization)
    #[arg(long)]
    pub org: Option<String>,

    /// Clone the repositories that are not checked out yet
    #[arg(long)]
    pub clone: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}
