//! Route table inspector and navigation driver.
//!
//! ```text
//! config (TOML, optional)
//!     → validated NavigatorConfig
//!     → app route table compiled and validated
//!     → Navigator
//!     → subcommand: routes | check | resolve | navigate | open
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use app_navigator::app_routes::app_table;
use app_navigator::config::{load_config, NavigatorConfig};
use app_navigator::navigation::{NavigationTarget, Navigator};
use app_navigator::observability::{logging, metrics};
use app_navigator::routing::{Params, RouteTable};

#[derive(Parser)]
#[command(name = "app-navigator")]
#[command(about = "Inspect and exercise the application route table", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the compiled route table
    Routes,
    /// Validate the configuration and the route table
    Check,
    /// Resolve a path without navigating
    Resolve { path: String },
    /// Navigate through a sequence of paths, printing each outcome
    Navigate {
        #[arg(required = true)]
        targets: Vec<String>,
        /// Treat targets as browser URLs that include the history base
        #[arg(long)]
        url: bool,
    },
    /// Navigate to a named route
    Open {
        name: String,
        /// Route parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => NavigatorConfig::default(),
    };
    logging::init_logging(&config.observability)?;

    let metrics_handle = if config.observability.metrics_enabled {
        Some(metrics::install_recorder()?)
    } else {
        None
    };

    let table = Arc::new(app_table(config.resolver.clone())?);
    tracing::info!(
        routes = table.records().len(),
        max_redirects = config.resolver.max_redirects,
        strict = config.resolver.strict,
        base = %config.history.base,
        "Route table ready"
    );
    let navigator = Navigator::new(table.clone(), &config.history);

    match cli.command {
        Commands::Routes => print_routes(&table),
        Commands::Check => {
            println!("configuration and {} routes are valid", table.records().len());
        }
        Commands::Resolve { path } => match navigator.resolve(&NavigationTarget::from(path.as_str())) {
            Ok((location, resolved)) => {
                let views: Vec<&str> = table
                    .views_for(&resolved)
                    .map(|(_, component)| component.view_name())
                    .collect();
                print_json(&json!({
                    "location": location,
                    "resolved": resolved,
                    "views": views,
                }))?;
            }
            Err(e) => print_json(&json!({ "error": e.to_string(), "kind": e.kind() }))?,
        },
        Commands::Navigate { targets, url } => {
            for target in targets {
                let result = if url {
                    navigator.navigate_to_url(&target).await
                } else {
                    navigator.navigate_to_path(&target).await
                };
                match result {
                    Ok(state) => print_json(&json!({ "target": target, "state": &*state }))?,
                    Err(e) => print_json(&json!({
                        "target": target,
                        "error": e.to_string(),
                        "kind": e.kind(),
                    }))?,
                }
            }
        }
        Commands::Open { name, params } => {
            let params: Params = params.into_iter().collect();
            match navigator.navigate_to_name(&name, params).await {
                Ok(state) => print_json(&json!({ "state": &*state }))?,
                Err(e) => print_json(&json!({ "error": e.to_string(), "kind": e.kind() }))?,
            }
        }
    }

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }
    Ok(())
}

fn print_routes(table: &RouteTable) {
    for record in table.records() {
        let target = match (&record.component, &record.redirect) {
            (Some(component), _) if component.is_deferred() => {
                format!("deferred {}", component.view_name())
            }
            (Some(component), _) => format!("resident {}", component.view_name()),
            (None, Some(redirect)) => format!("redirect -> {}", redirect),
            (None, None) => "group".to_string(),
        };
        println!(
            "{:<76} {:<24} {}",
            record.path(),
            record.name.as_deref().unwrap_or("-"),
            target
        );
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
