//! CLI command definitions and dispatch.

pub mod check;
pub mod login;
pub mod logout;
pub mod request;
pub mod whoami;

use clap::{Parser, Subcommand};

use salonhub_core::config::AppConfig;
use salonhub_core::error::AppError;

use crate::context::Context;
use crate::output::OutputFormat;

/// Command-line access to the SalonHub salon management API
#[derive(Debug, Parser)]
#[command(name = "salonhub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment, selects `config/<env>.toml`
    #[arg(short, long, global = true, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with username and password
    Login(login::LoginArgs),
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Check whether the signed-in user holds any of the given roles
    Check(check::CheckArgs),
    /// Send an authenticated request to the API
    Request(request::RequestArgs),
}

impl Cli {
    /// Restore the session and run the selected command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = Context::connect(config).await?;

        match &self.command {
            Commands::Login(args) => login::execute(args, &ctx, self.format).await,
            Commands::Logout => logout::execute(&ctx).await,
            Commands::Whoami => whoami::execute(&ctx, self.format).await,
            Commands::Check(args) => check::execute(args, &ctx, self.format).await,
            Commands::Request(args) => request::execute(args, &ctx, self.format).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["salonhub", "whoami", "--format", "json", "-e", "staging"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Whoami));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.env, "staging");
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["salonhub", "logout"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.env, "development");
    }

    #[test]
    fn test_check_requires_a_role() {
        assert!(Cli::try_parse_from(["salonhub", "check"]).is_err());

        let cli = Cli::try_parse_from(["salonhub", "check", "ADMIN", "ROLE_MANAGER"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert_eq!(args.roles, ["ADMIN", "ROLE_MANAGER"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_request_arguments() {
        let cli = Cli::try_parse_from([
            "salonhub",
            "request",
            "post",
            "/clients",
            "--body",
            r#"{"name":"Maria"}"#,
            "-q",
            "page=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Request(args) => {
                assert_eq!(args.method, "post");
                assert_eq!(args.path, "/clients");
                assert_eq!(args.body.as_deref(), Some(r#"{"name":"Maria"}"#));
                assert_eq!(args.query, [("page".to_string(), "2".to_string())]);
                assert!(!args.anonymous);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
