//! CLI command implementations

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::args::{Cli, Command, ServeArgs};
use super::errors::{CliError, CliResult};
use crate::data::DataStore;
use crate::http_server::{ApiError, HttpServer, HttpServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::query::StatsAggregator;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.verbose {
        Logger::set_min_severity(Severity::Trace);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::Stats { commodity, data } => {
            stats(commodity.as_deref(), data.as_deref(), &mut io::stdout())
        }
    }
}

/// Layer the server configuration: defaults, then the config file, then
/// environment and flags (clap already prefers flags over environment).
pub fn resolve_config(args: &ServeArgs) -> CliResult<HttpServerConfig> {
    let mut config = match &args.config {
        Some(path) => HttpServerConfig::from_file(path)?,
        None => HttpServerConfig::default(),
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data) = &args.data {
        config.data_path = Some(data.clone());
    }

    Ok(config)
}

/// Load the dataset and serve the HTTP API until interrupted
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    log_event(Event::BootStart);

    let config = resolve_config(args)?;
    let data_path = config.resolved_data_path().display().to_string();
    let port = config.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("host", config.host.as_str()),
            ("port", port.as_str()),
            ("data_path", data_path.as_str()),
        ],
    );

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::server_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the statistics JSON for `commodity` (or all records) to `out`.
///
/// Unlike the server, an unreadable dataset is an error here.
pub fn stats<W: Write>(
    commodity: Option<&str>,
    data: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let path: PathBuf = data
        .map(Path::to_path_buf)
        .unwrap_or_else(DataStore::default_path);
    let store = DataStore::try_load(&path).map_err(|e| CliError::io_error(e.to_string()))?;

    let stats = StatsAggregator::for_commodity(&store, commodity)
        .ok_or_else(|| CliError::not_found(ApiError::CommodityNotFound.to_string()))?;

    serde_json::to_writer_pretty(&mut *out, &stats)?;
    writeln!(out)?;
    Ok(())
}
