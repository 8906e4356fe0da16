use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = duet::cli::Cli::parse();

    match cli.command.clone() {
        Some(duet::cli::CliCommand::Tui) | None => {
            let config = duet::config::from_cli(&cli)?;
            duet::tui::run(config)?;
        }
        Some(command) => {
            init_tracing(cli.log_filter.clone())?;
            let config = duet::config::from_cli(&cli)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            duet::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}

// The TUI owns the terminal, so log output stays off unless a one-shot
// command runs.
fn init_tracing(filter: Option<String>) -> Result<()> {
    let filter = filter.unwrap_or_else(|| "warn".to_string());
    let directive: Directive = filter.parse()?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}
