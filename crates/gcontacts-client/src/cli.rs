//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use gcontacts_core::ContactFields;

/// gcontacts - create, edit and delete Google contacts
#[derive(Debug, Parser)]
#[command(name = "gcontacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true, env = "GCONTACTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Path to the OAuth token file
    #[arg(long, global = true, env = "GCONTACTS_TOKEN_PATH")]
    pub token_path: Option<PathBuf>,

    /// Refresh the access token even if it has not expired
    #[arg(long, global = true)]
    pub force_refresh: bool,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a contact
    Create(ContactArgs),

    /// Overwrite a contact's fields
    ///
    /// The phone list is replaced with the given --mobile values. Fields not
    /// given keep their stored values.
    Edit {
        /// Resource name (`people/<id>`) or bare id
        resource_name: String,

        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Delete a contact
    Delete {
        /// Resource name (`people/<id>`) or bare id
        resource_name: String,
    },

    /// Refresh the access token if needed and show its status
    Token,

    /// Run the HTTP service in the foreground
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:5000
        #[arg(long)]
        bind: Option<String>,

        /// Path to mount the routes under, e.g. /raman
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Contact fields shared by `create` and `edit`.
#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    /// Given name
    #[arg(long)]
    pub first_name: String,

    /// Family name
    #[arg(long)]
    pub last_name: String,

    /// Organization name
    #[arg(long)]
    pub company: Option<String>,

    /// Phone number (repeat the flag for several numbers)
    #[arg(long, action = clap::ArgAction::Append)]
    pub mobile: Vec<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Free-text note
    #[arg(long)]
    pub note: Option<String>,
}

impl From<ContactArgs> for ContactFields {
    fn from(args: ContactArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            company: args.company,
            mobile: args.mobile,
            email: args.email,
            note: args.note,
        }
    }
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
