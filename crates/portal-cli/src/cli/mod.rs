use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `portal` binary.
#[derive(Debug, Parser)]
#[command(name = "portal", version, about = "Survey portal - role-gated survey client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::users::RoleArg;
    use super::subcommands::{AuthCommands, UsersCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["portal", "--format", "raw", "--verbose", "survey"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Survey));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["portal", "auth", "status", "--quiet"])
            .expect("cli should parse");
        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthCommands::Status
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["portal", "--format", "table", "survey"]).is_err());
    }

    #[test]
    fn login_requires_token() {
        assert!(Cli::try_parse_from(["portal", "auth", "login"]).is_err());
        let cli = Cli::try_parse_from(["portal", "auth", "login", "--token", "a.b.c"])
            .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Login(args),
        } = cli.command
        else {
            panic!("expected auth login");
        };
        assert_eq!(args.token, "a.b.c");
    }

    #[test]
    fn route_takes_path() {
        let cli = Cli::try_parse_from(["portal", "route", "/admin/dashboard"])
            .expect("cli should parse");
        let Commands::Route(args) = cli.command else {
            panic!("expected route");
        };
        assert_eq!(args.path, "/admin/dashboard");
    }

    #[test]
    fn users_add_defaults_to_survey_taker() {
        let cli = Cli::try_parse_from(["portal", "users", "add", "ada@example.org"])
            .expect("cli should parse");
        let Commands::Users {
            action: UsersCommands::Add(args),
        } = cli.command
        else {
            panic!("expected users add");
        };
        assert_eq!(args.email, "ada@example.org");
        assert_eq!(args.role, RoleArg::SurveyTaker);
    }

    #[test]
    fn users_set_role_parses_kebab_case_roles() {
        let cli = Cli::try_parse_from([
            "portal",
            "users",
            "set-role",
            "ada@example.org",
            "researcher",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Users {
                action: UsersCommands::SetRole(ref args)
            } if args.role == RoleArg::Researcher
        ));
        assert!(Cli::try_parse_from(["portal", "users", "set-role", "a@b.c", "owner"]).is_err());
    }
}
