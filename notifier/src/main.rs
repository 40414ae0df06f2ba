//! dtnotify - Entry Point

use std::process;

use clap::Parser;
use tracing::debug;

use dtnotify::app::cli::Args;
use dtnotify::app::options::OutputFormat;
use dtnotify::app::run::run;
use dtnotify::logs::init_logging;
use dtnotify::models::outcome::ModuleResult;
use dtnotify::storage::settings::Settings;
use dtnotify::utils::LONG_VERSION;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => match Settings::load(path).await {
            Ok(settings) => settings,
            Err(e) => exit_with(&ModuleResult::config_error(&e.to_string()), args.output),
        },
        None => Settings::default(),
    };

    let options = args.into_options(settings);

    if let Err(e) = init_logging(options.log.clone()) {
        eprintln!("Failed to initialize logging: {e}");
    }
    debug!("dtnotify {}", LONG_VERSION);

    let output = options.output;
    let result = run(options).await;
    exit_with(&result, output);
}

fn exit_with(result: &ModuleResult, output: OutputFormat) -> ! {
    match output {
        OutputFormat::Json => match result.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Failed to serialize result: {e}"),
        },
        OutputFormat::Text => println!("{}", result.to_text()),
    }
    process::exit(result.exit_code());
}
