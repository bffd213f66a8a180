use clap::{Args, Subcommand, ValueEnum};
use portal_core::Role;

/// User directory commands (admin only).
#[derive(Clone, Debug, Subcommand)]
pub enum UsersCommands {
    /// List all users with their roles.
    List,
    /// Invite a new user.
    Add(UsersAddArgs),
    /// Change the role of an existing user, addressed by email.
    SetRole(UsersSetRoleArgs),
}

#[derive(Clone, Debug, Args)]
pub struct UsersAddArgs {
    pub email: String,
    #[arg(long, value_enum, default_value = "survey-taker")]
    pub role: RoleArg,
}

#[derive(Clone, Debug, Args)]
pub struct UsersSetRoleArgs {
    pub email: String,
    #[arg(value_enum)]
    pub role: RoleArg,
}

/// Assignable roles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum RoleArg {
    Admin,
    Researcher,
    SurveyTaker,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Admin => Self::Admin,
            RoleArg::Researcher => Self::Researcher,
            RoleArg::SurveyTaker => Self::SurveyTaker,
        }
    }
}
