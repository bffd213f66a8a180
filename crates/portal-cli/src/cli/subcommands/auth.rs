use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Store an ID token issued by the identity provider.
    Login(AuthLoginArgs),
    /// Sign out and forget the stored token.
    Logout,
    /// Show current session and role.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Compact JWT ID token.
    #[arg(long)]
    pub token: String,
}
