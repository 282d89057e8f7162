//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Veridoc - register, version, and verify documents by content hash
#[derive(Parser, Debug)]
#[command(name = "vd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(long = "interactive", global = true, conflicts_with = "no_interactive")]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set AND stdin is a TTY
    pub fn interactive(&self) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account on the registry
    #[command(name = "signup")]
    Signup {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign in and store the session locally
    #[command(
        name = "login",
        long_about = "Sign in to the document registry.\n\n\
            On success the session cookie is stored in the per-user data \
            directory and reused by subsequent commands until it expires or \
            you log out."
    )]
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// End the session locally and server-side
    #[command(name = "logout")]
    Logout,

    /// List registered documents, grouped by lineage
    #[command(
        name = "list",
        long_about = "List registered documents grouped by lineage.\n\n\
            Each group shows its newest version first; results are paged.",
        after_help = "\
EXAMPLES:
    # Newest documents first (default)
    vd list

    # Filter by file name, oldest first
    vd list --query contract --sort oldest

    # Documents registered in June 2024, second page
    vd list --from 2024-06-01 --to 2024-06-30 --page 2

    # Cross-user listing (admin sessions only)
    vd list --admin"
    )]
    List {
        /// Sort order: latest or oldest
        #[arg(long, default_value = "latest")]
        sort: String,

        /// Free-text filter over file names
        #[arg(short = 'Q', long, default_value = "")]
        query: String,

        /// Inclusive lower date bound (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        from: String,

        /// Inclusive upper date bound (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        to: String,

        /// Page to display
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Request the cross-user admin listing
        #[arg(long)]
        admin: bool,
    },

    /// Register a document, as a new lineage or a new version
    #[command(
        name = "register",
        long_about = "Register a document with the registry.\n\n\
            By default a new lineage is created. With --update the file is \
            appended as the next version of an existing lineage; pass the \
            target document id, or pass --update alone to pick one \
            interactively. The password protects the detail view of the \
            registered version.",
        after_help = "\
EXAMPLES:
    # Register a new document (password prompted)
    vd register contract.pdf

    # Append a new version to a known lineage
    vd register contract-v2.pdf --update 6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c

    # Pick the target lineage interactively
    vd register contract-v2.pdf --update"
    )]
    Register {
        /// File to register
        file: PathBuf,

        /// Append to an existing lineage instead of creating a new one
        #[arg(long, value_name = "DOCUMENT_ID", num_args = 0..=1, default_missing_value = "")]
        update: Option<String>,

        /// Detail-view password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Verify a file against a registered original
    #[command(
        name = "verify",
        long_about = "Verify a file against a registered original.\n\n\
            The registry compares the uploaded file's content hash against \
            the registered original. Pass the original's hash, or omit it to \
            pick one interactively from your registered versions. A \
            well-formed comparison that finds the hashes differ is reported \
            as a verification failure."
    )]
    Verify {
        /// File to verify
        file: PathBuf,

        /// Content hash of the registered original (picked interactively
        /// when omitted)
        #[arg(long, value_name = "FILE_HASH")]
        original: Option<String>,
    },

    /// Show the detail record for a registered version
    #[command(
        name = "show",
        long_about = "Show the password-gated detail record for a version.\n\n\
            Non-admin sessions are challenged for the version's password; a \
            successful unlock is remembered for the rest of the session, so \
            showing the same version again asks nothing."
    )]
    Show {
        /// Content hash of the version
        hash: String,

        /// Open the document preview in the default application
        #[arg(long)]
        open: bool,
    },

    /// Delete a registered version
    #[command(
        name = "delete",
        long_about = "Delete a registered version.\n\n\
            The version's detail must have been disclosed first (vd show). \
            Deleting version 1 of a lineage removes the entire lineage, not \
            just that version."
    )]
    Delete {
        /// Content hash of the version
        hash: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
