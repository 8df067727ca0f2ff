//! wgrid - command-line front end for the dashboard layout engine.
//!
//! Every layout command opens the user's saved layout, applies one change,
//! waits for the save to finish and reports what happened.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::broadcast;
use widget_grid::config::{default, xdg, Config, ConfigError, ConfigLoader};
use widget_grid::drag::{DragController, DropOutcome, Point};
use widget_grid::persistence::{FileGateway, LayoutBlob};
use widget_grid::{
    logging, AddOutcome, LayoutEvent, LayoutStore, StoreOptions, WidgetCatalog,
};

/// Dashboard widget layout tool
#[derive(Parser)]
#[command(name = "wgrid")]
#[command(version, about = "Arrange analytics dashboard widgets on a 12-column grid")]
struct Cli {
    /// Layout owner (defaults to [dashboard] user_id)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Configuration file (defaults to the XDG config path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the wgrid CLI
#[derive(Subcommand)]
enum Commands {
    /// Print the current layout
    Show {
        /// Print the layout blob as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every widget the dashboard offers
    Catalog,

    /// Add a widget at the first free slot
    Add {
        /// Catalog id of the widget
        widget_id: String,
    },

    /// Remove a widget from the dashboard
    Remove {
        /// Catalog id of the widget
        widget_id: String,
    },

    /// Replace the layout with the default one
    Reset,

    /// Drag a widget by a pixel offset and drop it
    Drag {
        /// Catalog id of the widget
        widget_id: String,
        /// Horizontal offset in pixels
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        dx: f64,
        /// Vertical offset in pixels
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        dy: f64,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Config { action } = &cli.command {
        return run_config_command(action, cli.config.as_deref());
    }

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Warning: could not open log file {}: {e}", config.logging.file);
    }

    let catalog = WidgetCatalog::builtin();
    if let Commands::Catalog = cli.command {
        print_catalog(&catalog);
        return ExitCode::SUCCESS;
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let user_id = cli
        .user
        .unwrap_or_else(|| config.dashboard.user_id.clone());
    rt.block_on(run_layout_command(cli.command, &config, catalog, user_id))
}

fn run_config_command(action: &ConfigAction, explicit: Option<&std::path::Path>) -> ExitCode {
    let result: Result<(), ConfigError> = match action {
        ConfigAction::Init { force } => default::create_default_config(*force).map(|path| {
            println!("Created configuration at {}", path.display());
        }),
        ConfigAction::Path => {
            let path = explicit.map(PathBuf::from).unwrap_or_else(xdg::config_path);
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Validate => ConfigLoader::load(explicit).map(|config| {
            println!("Configuration is valid");
            println!("{config:#?}");
        }),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_layout_command(
    command: Commands,
    config: &Config,
    catalog: WidgetCatalog,
    user_id: String,
) -> ExitCode {
    let save_timeout = match config.persistence.save_timeout() {
        Ok(timeout) => timeout,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let gateway = Arc::new(FileGateway::new(config.persistence.layouts_dir()));
    let options = StoreOptions {
        save_timeout,
        ..StoreOptions::default()
    };
    let mut store = LayoutStore::open(Arc::new(catalog), gateway, user_id, options).await;
    let mut events = store.subscribe();

    match command {
        Commands::Show { json } => {
            return print_layout(&store, json);
        }
        Commands::Add { widget_id } => match store.add_widget(&widget_id) {
            Ok(AddOutcome::Added) => {}
            Ok(AddOutcome::AlreadyPresent) => {
                println!("{widget_id} is already on the dashboard");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        Commands::Remove { widget_id } => {
            if !store.remove_widget(&widget_id) {
                println!("{widget_id} is not on the dashboard");
            }
        }
        Commands::Reset => store.reset_layout(),
        Commands::Drag { widget_id, dx, dy } => {
            if let Err(code) = drag_widget(&mut store, config, &widget_id, dx, dy) {
                return code;
            }
        }
        Commands::Catalog | Commands::Config { .. } => {}
    }

    store.flush().await;
    report_events(&mut events)
}

/// Simulates a pointer drag that grabs the widget at its center.
fn drag_widget(
    store: &mut LayoutStore,
    config: &Config,
    widget_id: &str,
    dx: f64,
    dy: f64,
) -> Result<(), ExitCode> {
    let mut controller = DragController::new(config.grid.metrics());
    controller.set_edit_mode(true);

    let Some(instance) = store.layout().get(widget_id) else {
        eprintln!("Error: {widget_id} is not on the dashboard");
        return Err(ExitCode::FAILURE);
    };
    let center = controller.metrics().cell_rect(&instance.rect());
    let grab = Point::new(center.x + center.width / 2.0, center.y + center.height / 2.0);
    if !controller.pointer_down(store.layout(), grab) {
        eprintln!("Error: could not grab {widget_id}");
        return Err(ExitCode::FAILURE);
    }

    match controller.release(Point::new(grab.x + dx, grab.y + dy), store) {
        DropOutcome::Committed(rect) => {
            println!("Moved {widget_id} to ({}, {})", rect.x, rect.y);
            Ok(())
        }
        DropOutcome::Unchanged | DropOutcome::NotDragging => {
            println!("{widget_id} stays where it is");
            Ok(())
        }
        DropOutcome::Rejected(e) => {
            eprintln!("Error: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}

/// Prints queued event messages. Fails if any save failed.
fn report_events(events: &mut broadcast::Receiver<LayoutEvent>) -> ExitCode {
    let mut code = ExitCode::SUCCESS;
    while let Ok(event) = events.try_recv() {
        match event {
            LayoutEvent::SaveSucceeded { .. } => {}
            event if event.is_failure() => {
                eprintln!("Error: {}", event.message());
                code = ExitCode::FAILURE;
            }
            event => println!("{}", event.message()),
        }
    }
    code
}

fn print_layout(store: &LayoutStore, json: bool) -> ExitCode {
    if json {
        return match LayoutBlob::from_layout(store.layout()).to_json() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if store.layout().is_empty() {
        println!("Dashboard for {} is empty", store.user_id());
        return ExitCode::SUCCESS;
    }
    println!("Dashboard for {}:", store.user_id());
    for instance in store.layout().iter() {
        let title = store
            .catalog()
            .lookup(&instance.id)
            .map(|d| d.title.as_str())
            .unwrap_or("");
        println!(
            "  {:<20} {:<20} x={:<2} y={:<2} {}",
            instance.id,
            title,
            instance.x,
            instance.y,
            instance.dimensions()
        );
    }
    ExitCode::SUCCESS
}

fn print_catalog(catalog: &WidgetCatalog) {
    for definition in catalog.iter() {
        let premium = if definition.is_premium { " (premium)" } else { "" };
        println!(
            "{:<20} {:<20} {:<13} {} x {}{}",
            definition.id,
            definition.title,
            definition.category,
            definition.default_width,
            definition.default_height,
            premium
        );
    }
}
