use clap::Parser as _;
use monitor_hid_tools::commands::{self, Cli, Command};
use tracing_subscriber::filter::{LevelFilter, targets::Targets};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

const LOG_FILTER_VARIABLE: &str = "MONITOR_HID_TOOLS_LOG";

fn end<E: std::error::Error>(r: Result<(), E>) {
    std::process::exit(match r {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            let mut cause = e.source();
            while let Some(e) = cause {
                eprintln!("  because: {e}");
                cause = e.source();
            }
            1
        }
    });
}

fn log_filter() -> Targets {
    let default = Targets::new().with_default(LevelFilter::WARN);
    let Ok(description) = std::env::var(LOG_FILTER_VARIABLE) else {
        return default;
    };
    description.parse::<Targets>().unwrap_or_else(|e| {
        eprintln!("warning: ignoring {LOG_FILTER_VARIABLE}={description:?}: {e}");
        default
    })
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(log_filter())
        .init();
    let cli = Cli::parse();
    match cli.command {
        Some(Command::Properties(args)) => end(commands::properties::run(args)),
        None => end(commands::set::run(cli.set)),
    }
}
