use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// winmdscope - inspect the tables and custom attributes of Windows metadata files
#[derive(Debug, Parser)]
#[command(name = "winmdscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write the output to FILE instead of stdout, creating missing directories.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the present metadata tables and their row counts.
    Tables {
        /// Path to the .winmd file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show only a specific table (e.g., TypeDef, CustomAttribute).
        #[arg(short, long)]
        table: Option<String>,
    },

    /// List type definitions with their decoded attributes.
    Types {
        /// Path to the .winmd file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Filter by namespace.
        #[arg(long)]
        namespace: Option<String>,
    },

    /// List the methods, fields and parameters of one type with their decoded attributes.
    Members {
        /// Path to the .winmd file.
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Qualified name (Namespace.Name) of the type.
        #[arg(long, value_name = "NAME")]
        r#type: String,
    },
}
