//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use skill_core::ResolveStrategy;
use skill_harness::{Harness, LinkMode};

/// Skills - keep a skill library and your projects in sync
#[derive(Parser, Debug)]
#[command(name = "skills")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Library root (default: ~/.skills)
    #[arg(long, global = true, env = "SKILLS_LIBRARY", value_name = "DIR")]
    pub library: Option<PathBuf>,

    /// Project directory holding `.skills/` (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Copy a library skill into the project
    Install {
        /// Skill id
        id: String,

        /// Replace an existing project copy
        #[arg(short, long)]
        force: bool,
    },

    /// Update the project copy from the library
    ///
    /// Installs the skill if the project does not have it yet.
    Pull {
        /// Skill id
        id: String,
    },

    /// Publish the project copy as the next library version
    Push {
        /// Skill id
        id: String,
    },

    /// Settle a diverged skill by choosing one side
    ///
    /// Examples:
    ///   skills resolve review --strategy library   # discard project changes
    ///   skills resolve review --strategy project   # publish project changes
    Resolve {
        /// Skill id
        id: String,

        /// Which side wins
        #[arg(long, value_enum)]
        strategy: StrategyArg,
    },

    /// Remove a skill and its harness bindings from the project
    Uninstall {
        /// Skill id
        id: String,
    },

    /// Show sync status for one skill or every known skill
    Status {
        /// Skill id (all skills when omitted)
        id: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Project skills into tool directories
    Harness {
        #[command(subcommand)]
        action: HarnessAction,
    },
}

/// Harness subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HarnessAction {
    /// Materialize project skills into a harness and register it
    ///
    /// Without a harness, every registered harness is synced in its
    /// registered mode.
    Sync {
        /// claude-code, cursor or opencode
        harness: Option<Harness>,

        /// symlink or copy
        #[arg(long)]
        mode: Option<LinkMode>,

        /// Overwrite drifted copies
        #[arg(long)]
        force: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Copy harness content back into the project's canonical skills
    Import {
        harness: Harness,

        /// Relink imported entries (symlink) or leave them as copies
        #[arg(long)]
        mode: Option<LinkMode>,
    },

    /// Compare harness entries against the canonical skills
    Status {
        /// Harness (registered harnesses when omitted)
        harness: Option<Harness>,

        #[arg(long)]
        mode: Option<LinkMode>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove one skill's harness entry
    Unlink { harness: Harness, id: String },

    /// Delete a harness directory and its registration
    Remove { harness: Harness },

    /// List supported harnesses
    List,
}

/// `--strategy` values
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    Library,
    Project,
    Merge,
}

impl From<StrategyArg> for ResolveStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Library => ResolveStrategy::Library,
            StrategyArg::Project => ResolveStrategy::Project,
            StrategyArg::Merge => ResolveStrategy::Merge,
        }
    }
}
