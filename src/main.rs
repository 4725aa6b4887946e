//! specguard CLI entry point

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use specguard::cli::{Commands, ScanArgs};
use specguard::commands::{run_audit, run_scan, CommandContext, CommandOutput};
use specguard::{Cli, SpecGuardConfig};

/// Exit code when `audit --fail-on-error` finds error-severity issues
const BLOCKING_EXIT_CODE: u8 = 10;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let config = match SpecGuardConfig::discover(&config_root(&cli.command), cli.config.as_deref())
    {
        Ok(config) => config,
        Err(e) => {
            init_tracing("warn", cli.verbose);
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };
    init_tracing(&config.logging.level, cli.verbose);

    let ctx = CommandContext::from_cli(cli.format, cli.verbose, cli.progress, config);
    match run(&cli, &ctx) {
        Ok(output) => {
            print!("{}", output.rendered);
            if output.blocking {
                ExitCode::from(BLOCKING_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run(cli: &Cli, ctx: &CommandContext) -> specguard::Result<CommandOutput> {
    match &cli.command {
        Commands::Scan(args) => run_scan(args, ctx),
        Commands::Audit(args) => run_audit(args, ctx),
    }
}

/// Directory searched for `specguard.toml` when `--config` is not given
fn config_root(command: &Commands) -> PathBuf {
    match command {
        Commands::Audit(args) => args.root(),
        Commands::Scan(ScanArgs { path, .. }) => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("specguard={}", level)))
        .unwrap_or_else(|_| EnvFilter::new("specguard=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
