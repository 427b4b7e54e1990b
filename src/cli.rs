use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "extapi",
    version,
    about = "Extension API index and query tool",
    after_help = r#"Examples:
  extapi info
  extapi route "layout de Color"
  extapi route "offset de Color.a"
  extapi route "hash: 3863233950"
  extapi class Node
  extapi method add_child --class Node
  extapi builtin Color
  extapi layout Vector3 --config float_64
  extapi enum Node.ProcessMode
  extapi utility --category math
  extapi watch
"#
)]
pub struct Args {
    /// Path to the extension API document. Defaults to EXTAPI_SCHEMA.
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print document version and index counts.
    Info,
    /// Route one free-text question to the matching lookup.
    Route {
        /// The question, e.g. "layout de Color" or "classe Node".
        query: String,
    },
    /// Show a class summary: signatures, properties, signals, enums.
    Class { name: String },
    /// Find methods by name across all classes.
    Method {
        name: String,
        /// Restrict hits to one owning class (case-insensitive).
        #[arg(long)]
        class: Option<String>,
    },
    /// Find methods by primary or compatibility hash.
    Hash { hash: String },
    /// Show builtin-class detail, or list all builtin names.
    Builtin { name: Option<String> },
    /// Show size and member offsets of a builtin class.
    Layout {
        name: String,
        #[arg(long, default_value = "float_32")]
        config: String,
    },
    /// Show the byte offset of one builtin member.
    Offset {
        name: String,
        member: String,
        #[arg(long, default_value = "float_32")]
        config: String,
    },
    /// Look up an enum: "Name" is global, "Class.Name" is class-qualified.
    Enum { name: String },
    /// Utility functions: by name, by category, or the full catalog.
    Utility {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Look up a global constant, or list all constant names.
    Constant { name: Option<String> },
    /// List singletons.
    Singletons,
    /// Show a native structure, or list all native structure names.
    Native { name: Option<String> },
    /// Watch the document and reload the index when it changes.
    Watch,
}
