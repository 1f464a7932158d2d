//! CLI definition for the fieldset command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fieldset::View;

/// Fieldset - render and fill admin panel fields from YAML resource definitions.
///
/// Definitions live in `<definitions>/resources/*.yaml`, one file per resource.
/// Project defaults are read from `fieldset.{toml,yaml,yml,json}` in the
/// definitions directory and from `FIELDSET_` environment variables.
#[derive(Parser, Debug)]
#[command(name = "fieldset")]
#[command(version)]
#[command(about = "Render and fill admin panel fields from YAML resource definitions")]
#[command(long_about = "Render and fill admin panel fields from YAML resource definitions.\n\n\
    Environment variables:\n  \
    FIELDSET_FILE__DISK      Default disk for file fields\n  \
    FIELDSET_FILE__PATH      Default storage path for file fields\n  \
    FIELDSET_AUDIO__PRELOAD  Default preload for audio fields (none, metadata, auto)\n  \
    RUST_LOG                 Log filter when --debug is not given")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Directory holding resources/ and the optional fieldset config file
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub definitions: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the serialized fields of a resource for one view
    Render {
        /// Resource name as declared in its definition
        #[arg(long)]
        resource: String,
        /// JSON file holding the record to resolve against
        #[arg(long, value_name = "FILE")]
        record: PathBuf,
        /// View to render: index, detail, create or update
        #[arg(long, default_value = "detail", value_parser = parse_view)]
        view: View,
        /// JSON file holding the request context used for authorization
        #[arg(long, value_name = "FILE")]
        request: Option<PathBuf>,
    },

    /// Fill a model from a request and print the result
    Fill {
        /// Resource name as declared in its definition
        #[arg(long)]
        resource: String,
        /// JSON file holding the request payload
        #[arg(long, value_name = "FILE")]
        request: PathBuf,
        /// JSON file holding the model to fill; starts empty when omitted
        #[arg(long, value_name = "FILE")]
        model: Option<PathBuf>,
    },

    /// List resources and their field attributes
    List,
}

fn parse_view(s: &str) -> Result<View, String> {
    s.parse::<View>().map_err(|e| e.to_string())
}
