use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use envdoc::{
    commands::{
        config::{self, ConfigAction},
        generate::{self, GenerateCommand},
        list,
        show::{self, ShowCommand},
    },
    GlobalOpts,
};
use envdoc_logger as logger;

#[derive(Parser)]
#[command(name = "envdoc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Configuration variable documentation generator",
    long_about = "envdoc reads configuration struct declarations and documents every \
                  setting with its JSON path and environment variable."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure envdoc
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// List the products in the catalog
    List {
        /// Product catalog merged over the built-in one
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,
    },
    /// Write JSON and markdown documents for one or more products
    Generate(GenerateCommand),
    /// Print the variables of one product as JSON
    Show(ShowCommand),
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logger::verbosity_to_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(
        cli.global.verbosity_level(),
        cli.global.quiet,
        !cli.global.no_log_file,
    ) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    let result = match cli.command {
        Commands::Config { action } => config::handle_config(action, &cli.global),
        Commands::List { catalog } => list::list_products(&cli.global, catalog.as_deref()),
        Commands::Generate(cmd) => generate::handle_generate(cmd, &cli.global),
        Commands::Show(cmd) => show::handle_show(cmd, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        if cli.global.verbosity_level() > 0 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}
