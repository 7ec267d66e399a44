use crate::commands::{run_audit, run_export, AuditArgs, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use licicontrol::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "licicontrol",
    about = "Run the Licicontrol procurement-compliance service or its offline tools",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a legal opinion with the compliance heuristic
    Audit(AuditArgs),
    /// Convert a plain-text document to PDF or DOCX
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Audit(args) => run_audit(args),
        Command::Export(args) => run_export(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn audit_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["licicontrol", "audit"]).is_err());
        assert!(Cli::try_parse_from([
            "licicontrol",
            "audit",
            "--text",
            "parecer",
            "--file",
            "parecer.txt"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["licicontrol", "audit", "--text", "parecer"]).is_ok());
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["licicontrol"]).expect("parses without subcommand");
        assert!(cli.command.is_none());
    }
}
