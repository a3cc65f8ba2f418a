mod commands;
mod logging;

use clap::{Args, Parser, Subcommand};
use crudforge_core::CoreError;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "Scaffold CRUD layers and integration snippets from a model definition")]
struct Cli {
    /// Project root that generated paths resolve against
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/.crudforge/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Templates directory, overriding the configured one
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a component for a model
    Generate(GenerateArgs),

    /// Inspect or undo previous generations
    History {
        #[command(subcommand)]
        history_command: HistoryCommands,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Component: model, repository, service, handler, routes, wire, migration,
    /// permission, frontend-api, frontend-page, frontend-form, frontend-route or all
    pub component: Option<String>,

    /// Model name in PascalCase (e.g. Product)
    pub model: Option<String>,

    /// Fields as 'name:type[:comment],...'
    #[arg(long)]
    pub fields: Option<String>,

    /// Read the whole request from a JSON file
    #[arg(long, conflicts_with = "fields")]
    pub request: Option<PathBuf>,

    /// Table name (default: plural snake_case of the model)
    #[arg(long)]
    pub table: Option<String>,

    /// Package path, e.g. internal/admin
    #[arg(long)]
    pub package: Option<String>,

    /// Human-facing model name
    #[arg(long)]
    pub display_name: Option<String>,

    /// Replace existing files
    #[arg(long)]
    pub overwrite: bool,

    /// Skip the formatter
    #[arg(long)]
    pub no_format: bool,

    /// Skip the import optimizer
    #[arg(long)]
    pub no_optimize_imports: bool,

    /// Splice snippets into their target files
    #[arg(long)]
    pub apply_snippets: bool,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List generation records
    List {
        #[arg(long)]
        json: bool,
    },

    /// Show one module's record
    Show { module: String },

    /// Delete a module's generated files and its record
    Delete { module: String },

    /// Delete every recorded file and reset the history
    Clear,
}

fn main() -> Result<(), CoreError> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_json)?;

    let config = commands::load_config(&cli.root, cli.config.as_deref(), cli.templates.as_deref())?;

    let success = match cli.command {
        Commands::Generate(args) => commands::generate::run(config, &args)?,
        Commands::History { history_command } => match history_command {
            HistoryCommands::List { json } => commands::history::list(&config, json)?,
            HistoryCommands::Show { module } => commands::history::show(&config, &module)?,
            HistoryCommands::Delete { module } => commands::history::delete(&config, &module)?,
            HistoryCommands::Clear => commands::history::clear(&config)?,
        },
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
