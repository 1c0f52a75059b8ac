mod commands;
mod config;
mod diagnostics;
mod error;
mod html;
mod injector;
mod page;
mod resolver;
mod types;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

use crate::commands::OutputFormat;
use crate::config::ConfigOverrides;

#[derive(Parser)]
#[command(name = "srclink", about = "Link rustdoc items to their source in a hosted repository")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert repository permalinks next to every source link under DOC_DIR
    Inject {
        /// Rendered documentation root
        #[arg(default_value = "target/doc")]
        doc_dir: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
        /// Report what would change without writing any page
        #[arg(long)]
        dry_run: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the permalink a single source href would receive
    Resolve {
        /// Href of a generator source link, e.g. ../src/my_crate/lib.rs.html#42
        href: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Write the hosting settings to .srclink.toml
    Init {
        /// Provider name shown in link text
        #[arg(long)]
        label: String,
        /// Repository tree URL that relative source paths are appended to
        #[arg(long)]
        base_url: String,
        /// Crate directory name under the generated src/ tree
        #[arg(long)]
        root_marker: String,
    },
    /// Inject once, then again whenever DOC_DIR changes
    Watch {
        /// Rendered documentation root
        #[arg(default_value = "target/doc")]
        doc_dir: PathBuf,
        #[command(flatten)]
        config: ConfigArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Flags that override `.srclink.toml`.
#[derive(Args)]
struct ConfigArgs {
    /// Provider name shown in link text
    #[arg(long)]
    label: Option<String>,
    /// Repository tree URL that relative source paths are appended to
    #[arg(long)]
    base_url: Option<String>,
    /// Crate directory name under the generated src/ tree
    #[arg(long)]
    root_marker: Option<String>,
    /// Class marking generator source links (repeatable)
    #[arg(long = "class")]
    classes: Vec<String>,
}

impl From<ConfigArgs> for ConfigOverrides {
    fn from(args: ConfigArgs) -> Self {
        return Self {
            hosting_label: args.label,
            link_classes: args.classes,
            project_root_marker: args.root_marker,
            repository_base_url: args.base_url,
        };
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Inject { doc_dir, config, dry_run, format } => {
            commands::inject(&doc_dir, &ConfigOverrides::from(config), dry_run, format).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Resolve { href, config } => commands::resolve(&href, &ConfigOverrides::from(config)),
        Commands::Init { label, base_url, root_marker } => {
            commands::init(&label, &base_url, &root_marker).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Watch { doc_dir, config, format } => {
            watch::run(&doc_dir, &ConfigOverrides::from(config), format).map(|()| return ExitCode::SUCCESS)
        },
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Log to stderr, filtered by `RUST_LOG` when set, otherwise by `-v` count.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(format!("error,srclink={level}"));
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_fmt::layer().with_writer(std::io::stderr))
        .init();
}
