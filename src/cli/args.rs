// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the main CLI structure and subcommands for orderflow

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "orderflow")]
#[command(about = "A workflow engine for purchase-order processing pipelines")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute the purchase-order workflow over discovered suites
    Run {
        #[arg(help = "Optional suite directory under the orders root")]
        suite: Option<String>,

        #[arg(short, long, help = "Root directory containing suite folders")]
        root: Option<PathBuf>,

        #[arg(long, help = "Number of retries after the first attempt")]
        retries: Option<u32>,

        #[arg(long, help = "Order total above which an attention flag is raised")]
        threshold: Option<f64>,

        #[arg(long, help = "Days ahead of the order date a due date counts as due soon")]
        due_within: Option<i64>,

        #[arg(
            long,
            value_parser = humantime::parse_duration,
            help = "Injected latency before each task (e.g. 250ms)"
        )]
        task_delay: Option<Duration>,
    },

    /// Validate discovery and the dependency graph without executing
    Validate {
        #[arg(help = "Optional suite directory under the orders root")]
        suite: Option<String>,

        #[arg(short, long, help = "Root directory containing suite folders")]
        root: Option<PathBuf>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
