use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use massbind::cancel::install_interrupt_handler;
use massbind::commands::{collect::CollectOptions, config_cmd::ConfigOptions, scan::ScanOptions};
use massbind::commands::{execute_collect, execute_config, execute_scan};
use massbind::error::AppError;
use massbind::logging;
use massbind::model::PlotFormat;

fn main() {
    if let Err(err) = run() {
        tracing::error!(%err, "massbind failed");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Collect(args) => {
            logging::init(args.search.verbose);
            let options = CollectOptions {
                output: args.output,
                format: args.search.format,
                directories: args.search.directories,
                list_all: args.search.all,
                overwrite: args.overwrite,
                keystore: args.search.keystore,
                cancel: install_interrupt_handler()?,
            };
            execute_collect(options)?;
        }
        Commands::Scan(args) => {
            logging::init(args.verbose);
            let options = ScanOptions {
                format: args.format,
                directories: args.directories,
                list_all: args.all,
                keystore: args.keystore,
                verbose: args.verbose,
                cancel: install_interrupt_handler()?,
            };
            execute_scan(options)?;
        }
        Commands::Config(args) => {
            logging::init(false);
            let options = ConfigOptions {
                show_path: args.path,
                edit: args.edit,
                add_directory: args.add_dir,
                add_exclude: args.add_exclude,
            };
            execute_config(options)?;
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "massbind",
    version,
    about = "Get MASS binding target list by searching for plot files from disk."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search plot files and save their binding targets to a JSON file.
    #[command(visible_alias = "c")]
    Collect(CollectArgs),
    /// Search plot files and print what would be collected.
    #[command(visible_alias = "sc")]
    Scan(SearchArgs),
    /// Manage massbind configuration (search directories, exclusions).
    #[command(visible_alias = "cfg")]
    Config(ConfigArgs),
}

#[derive(Args)]
struct CollectArgs {
    /// File to export the binding list to.
    #[arg(value_name = "EXPORT_FILE")]
    output: PathBuf,

    /// Overwrite an existing binding list file.
    #[arg(short = 'o', long = "overwrite", action = ArgAction::SetTrue)]
    overwrite: bool,

    #[command(flatten)]
    search: SearchArgs,
}

#[derive(Args)]
struct SearchArgs {
    /// Plot type to search for: m1 (native MassDB) or m2 (Chia plot).
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    format: PlotFormat,

    /// Directories to search (defaults to the configured directories).
    #[arg(short = 'd', long = "dirs", value_name = "DIR", action = ArgAction::Append, value_delimiter = ',')]
    directories: Vec<PathBuf>,

    /// List all files instead of only plotted files.
    #[arg(short = 'a', long = "all", action = ArgAction::SetTrue)]
    all: bool,

    /// Keystore used to drop m2 plots without local private keys.
    #[arg(long = "keystore", value_name = "PATH")]
    keystore: Option<PathBuf>,

    /// Show debug logs and, for scan, every collected plot.
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,

    /// Add a default search directory.
    #[arg(long = "add-dir", value_name = "DIR")]
    add_dir: Option<String>,

    /// Add a glob pattern for plot files to ignore.
    #[arg(long = "add-exclude", value_name = "GLOB")]
    add_exclude: Option<String>,
}
