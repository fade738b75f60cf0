use clap::error::ErrorKind;
use colored::Colorize;
use linkpurpose::commands::command_argument_builder;
use linkpurpose::handlers::handle_check;
use linkpurpose_core::print_banner;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let matches = match command_argument_builder().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage problems go to stdout
            println!("{}", e.render());
            std::process::exit(1);
        }
    };

    init_tracing(matches.get_flag("verbose"));

    if !matches.get_flag("quiet") {
        print_banner();
    }

    if let Err(e) = handle_check(&matches).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
