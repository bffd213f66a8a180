use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, UsersCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Sign-in and session status.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Show where a path leads for the current session.
    Route(RouteArgs),
    /// Take the survey interactively.
    Survey,
    /// Manage users and roles (admin only).
    Users {
        #[command(subcommand)]
        action: UsersCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct RouteArgs {
    /// Path to resolve, e.g. `/admin/dashboard`.
    pub path: String,
}
