use clap::Parser;
use wand_cli::Cli;

fn main() {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = cli.execute() {
        eprintln!("Error: {err:#}");

        // Failed tools pass their exit code through
        let code = match err.downcast_ref::<wand_core::Error>() {
            Some(wand_core::Error::Execution {
                code: Some(code), ..
            }) => *code,
            _ => 1,
        };
        std::process::exit(code);
    }
}
