mod age;
mod api;
mod config;
mod serve;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use bossreport_logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "bossreport",
    about = "Workplace performance report service",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Bind address (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port (default: $PORT, then the config file, then 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the config file
        #[arg(short, long, default_value = config::CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Log output format
        #[arg(long, value_enum, default_value = "pretty")]
        log_format: LogFormatChoice,

        /// Tracing filter when RUST_LOG is unset
        #[arg(long, default_value = "info")]
        log_level: String,

        /// Also append request events to this file as JSON lines
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Resolve a birth date to an age without starting the service
    Age {
        /// Day of month
        #[arg(long)]
        day: Option<String>,

        /// Month as a number, English name or Chinese token (一月 … 十二月)
        #[arg(long)]
        month: Option<String>,

        /// Four-digit year
        #[arg(long)]
        year: Option<String>,

        /// Freeform date, read day-first (e.g. 15-06-2000)
        #[arg(long)]
        dob: Option<String>,

        /// Reference date as YYYY-MM-DD (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Fail instead of reporting age 0 for unusable input
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            config,
            log_format,
            log_level,
            log_file,
        } => {
            serve::handle_serve_command(serve::ServeArgs {
                host,
                port,
                config_path: config,
                log_format: log_format.into(),
                log_level,
                log_file,
            })
            .await
        }
        Commands::Age {
            day,
            month,
            year,
            dob,
            today,
            strict,
        } => age::handle_age_command(age::AgeArgs {
            day,
            month,
            year,
            dob,
            today,
            strict,
        }),
    }
}
