use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom settings file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Path to pacman.conf
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub pacman_config: Option<String>,

    /// Override the database path from pacman.conf
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub dbpath: Option<String>,

    /// Override the root directory from pacman.conf
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub root: Option<String>,

    /// Only consult these repositories (repeatable)
    #[arg(short, long = "repo", global = true)]
    pub repos: Vec<String>,

    /// Sync repository databases into a temporary directory first
    #[arg(short, long, global = true)]
    pub temp_db: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search packages by name or description
    #[command(arg_required_else_help = true)]
    #[clap(name = "search", visible_alias = "s")]
    Search {
        /// Search term
        term: String,

        /// Match anywhere instead of only at the start
        #[arg(required = false, long)]
        contains: bool,

        /// Also match descriptions
        #[arg(required = false, short, long)]
        desc: bool,

        /// Maximum number of results
        #[arg(required = false, short, long)]
        limit: Option<usize>,

        /// Only search installed packages
        #[arg(required = false, long)]
        local: bool,
    },

    /// List installed packages with newer versions in the repositories
    #[clap(name = "upgrades", visible_alias = "u")]
    Upgrades,

    /// Show package details
    #[command(arg_required_else_help = true)]
    #[clap(name = "info", visible_alias = "query", visible_alias = "Q")]
    Info {
        /// Packages to inspect
        #[arg(required = true)]
        packages: Vec<String>,
    },
}
