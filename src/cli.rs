//! Command-line interface definitions
//!
//! Arguments are grouped by the component that consumes them, the same way
//! the library splits record addressing, reader configuration, and output.

use crate::config::{BasePath, ReaderConfig, RequestStrategy};
use crate::layout::DatastoreLayout;
use crate::loader::MAX_PROPERTY_LENGTH;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Read the properties of a metadata record stored as one file per property
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Which record to read
    #[command(flatten)]
    pub record: RecordConfig,

    /// How to read it
    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

// ============================================================================
// FUNCTIONAL GROUPS: Organized by what component consumes them
// ============================================================================

/// Record addressing
///
/// Used by: `main()`, `DatastoreLayout::metadata_path()`
#[derive(clap::Args, Debug, Clone)]
pub struct RecordConfig {
    /// Metadata directory to read
    #[arg(value_name = "DIRECTORY", conflicts_with = "uid")]
    pub directory: Option<PathBuf>,

    /// Datastore root, used with --uid
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Record uid to read from the datastore at --root
    #[arg(long, value_name = "UID", requires = "root")]
    pub uid: Option<String>,

    /// Property to read (repeatable); all properties when omitted
    #[arg(short, long = "property", value_name = "NAME")]
    pub properties: Vec<String>,
}

/// Reader configuration
///
/// Used by: `PropertyReader::new()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Reader Options")]
pub struct ReaderArgs {
    /// Read property files from a `metadata` subdirectory of DIRECTORY
    /// (--uid already resolves to the record's metadata directory)
    #[arg(long, conflicts_with = "uid")]
    pub metadata_subdir: bool,

    /// Select requested properties by listing the directory; requested
    /// properties with no file are left out instead of failing
    #[arg(long)]
    pub filtered_scan: bool,

    /// Largest accepted property value in bytes
    #[arg(long, value_name = "BYTES", default_value_t = MAX_PROPERTY_LENGTH)]
    pub max_value_len: u64,
}

impl ReaderArgs {
    /// Build the library configuration
    #[must_use]
    pub const fn to_config(&self) -> ReaderConfig {
        let base = if self.metadata_subdir {
            BasePath::MetadataSubdir
        } else {
            BasePath::Direct
        };
        let strategy = if self.filtered_scan {
            RequestStrategy::FilteredScan
        } else {
            RequestStrategy::ExplicitList
        };
        ReaderConfig {
            base,
            strategy,
            max_value_len: self.max_value_len,
        }
    }
}

/// Output and logging configuration
///
/// Used by: `main()`, logging initialization
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all log output except errors)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for retrieved properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `name: value` line per property, bytes escaped
    #[default]
    Text,
    /// A JSON object; binary values as `{"base64": ...}`
    Json,
}

/// The directory to read, after resolving --root/--uid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A metadata directory given directly
    Directory(PathBuf),
    /// A record addressed through the datastore layout
    Record {
        /// Datastore layout
        layout: DatastoreLayout,
        /// Record uid
        uid: String,
    },
}

// ============================================================================
// IMPLEMENTATION: Convenience methods and validation
// ============================================================================

impl Args {
    /// Validate command-line arguments
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Neither DIRECTORY nor --uid is given
    /// - --root is given without --uid
    /// - The maximum value length is 0
    /// - Both --quiet and --verbose options are used
    pub fn validate(&self) -> Result<()> {
        if self.record.directory.is_none() && self.record.uid.is_none() {
            anyhow::bail!("Either a DIRECTORY or --uid with --root is required");
        }

        if self.record.root.is_some() && self.record.uid.is_none() {
            anyhow::bail!("--root is only meaningful together with --uid");
        }

        if self.reader.max_value_len == 0 {
            anyhow::bail!("Maximum value length must be greater than 0");
        }

        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use both --quiet and --verbose options");
        }

        Ok(())
    }

    /// Resolve what to read
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments do not name a directory or record;
    /// call [`Args::validate`] first.
    pub fn target(&self) -> Result<Target> {
        match (&self.record.directory, &self.record.root, &self.record.uid) {
            (Some(dir), _, _) => Ok(Target::Directory(dir.clone())),
            (None, Some(root), Some(uid)) => Ok(Target::Record {
                layout: DatastoreLayout::new(root.clone()),
                uid: uid.clone(),
            }),
            _ => anyhow::bail!("No metadata directory or record specified"),
        }
    }

    /// Requested property names, `None` for all
    #[must_use]
    pub fn requested(&self) -> Option<&[String]> {
        if self.record.properties.is_empty() {
            None
        } else {
            Some(&self.record.properties)
        }
    }

    /// Maximum log level implied by --quiet/--verbose
    #[must_use]
    pub const fn log_level(&self) -> tracing::Level {
        if self.output.quiet {
            return tracing::Level::ERROR;
        }
        match self.output.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
