//! CLI entrypoint for Footing Quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use footing_application::{
    AuditBatchUseCase, AuditCompanyUseCase, AuditLogger, AuditProgressNotifier, ConsensusConfig,
    DocumentSource, NoProgress, ResultSink, RunConsensusUseCase,
};
use footing_domain::{OutputFormat, ProviderSettings};
use footing_infrastructure::{
    ConfigLoader, FileConfig, JsonFileSink, JsonlAuditLogger, LocalDocumentSource, ProviderGateway,
};
use footing_presentation::{Cli, ConsoleFormatter, ProgressReporter, apply_color_setting};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("{}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    apply_color_setting(config.output.color);

    let _log_guard = init_logging(&cli, &config);
    info!("Starting Footing Quorum");

    let issues = config.validate();
    if !issues.is_empty() {
        eprint!("{}", ConsoleFormatter::format_issues(&issues));
    }
    if ConsensusConfig::has_errors(&issues) {
        bail!("invalid configuration");
    }

    let consensus_config = config.consensus_config();
    let settings = config.provider_settings();
    let output_format = config.output.format.unwrap_or_default();

    // === Dependency Injection ===
    let gateway = Arc::new(ProviderGateway::new(
        settings.clone(),
        Duration::from_secs(config.provider.request_timeout_secs),
    )?);

    let mut consensus = RunConsensusUseCase::new(gateway, consensus_config.clone());
    if let Some(path) = &config.logging.audit_log {
        match JsonlAuditLogger::open(path) {
            Some(logger) => {
                let logger: Arc<dyn AuditLogger> = Arc::new(logger);
                consensus = consensus.with_logger(logger);
            }
            None => warn!("Audit log {} could not be opened", path.display()),
        }
    }

    let documents: Arc<dyn DocumentSource> =
        Arc::new(LocalDocumentSource::new(&config.paths.input_dir));
    let sink: Arc<dyn ResultSink> = Arc::new(JsonFileSink::new(&config.paths.output_dir));
    let company_use_case = AuditCompanyUseCase::new(consensus, documents).with_sink(sink);

    if !cli.quiet && output_format == OutputFormat::Summary {
        println!("{}", ConsoleFormatter::run_header(&settings, &consensus_config));
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let reporter = ProgressReporter::new();
    let progress: &dyn AuditProgressNotifier = if cli.quiet { &NoProgress } else { &reporter };

    // Single company: audit directly
    if let [company] = cli.company.as_slice() {
        let output = company_use_case
            .execute_with_progress(company, progress, &cancel)
            .await?;
        print_company(&output, output_format);
        return Ok(ExitCode::SUCCESS);
    }

    let companies = (!cli.company.is_empty()).then(|| cli.company.clone());
    let batch = AuditBatchUseCase::new(company_use_case).with_concurrency(config.batch.concurrency);
    let summary = batch
        .execute_with_progress(companies, progress, &cancel)
        .await?;

    for output in &summary.succeeded {
        print_company(output, output_format);
    }
    if output_format == OutputFormat::Summary {
        print_batch(&summary, &settings, &consensus_config, &config);
    }

    if summary.succeeded.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Command-line flags take priority over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(provider) = cli.provider {
        config.provider.kind = provider.as_str().to_string();
    }
    if let Some(model) = &cli.model {
        config.provider.model = Some(model.clone());
    }
    if let Some(api_key) = &cli.api_key {
        config.provider.api_key = Some(api_key.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config.provider.base_url = Some(base_url.clone());
    }
    if let Some(retries) = cli.retries {
        config.consensus.max_retries = retries;
    }
    if let Some(agents) = cli.agents {
        config.consensus.agent_count = agents;
    }
    if let Some(tolerance) = cli.tolerance {
        config.consensus.tolerance = tolerance;
    }
    if let Some(input_dir) = &cli.input_dir {
        config.paths.input_dir = input_dir.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.paths.output_dir = output_dir.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.batch.concurrency = concurrency;
    }
    if let Some(format) = cli.output {
        config.output.format = Some(format.into());
    }
    if cli.no_color {
        config.output.color = false;
    }
}

/// Stderr logging filtered by verbosity, plus a file writer when configured.
fn init_logging(cli: &Cli, config: &FileConfig) -> Option<WorkerGuard> {
    let filter = || EnvFilter::new(cli.log_level());
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let log_file = config.logging.file.as_ref().and_then(|path| {
        let file_name = path.file_name()?.to_owned();
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.to_path_buf())
            .unwrap_or_else(|| ".".into());
        Some((dir, file_name))
    });

    match log_file {
        Some((dir, file_name)) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}

/// Cancel in-flight audits on Ctrl+C.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling running audits");
            cancel.cancel();
        }
    });
}

fn print_company(output: &footing_application::CompanyAuditOutput, format: OutputFormat) {
    match format {
        OutputFormat::Summary => print!("{}", ConsoleFormatter::format_company(output)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&output.audit)),
    }
}

fn print_batch(
    summary: &footing_application::BatchSummary,
    settings: &ProviderSettings,
    consensus: &ConsensusConfig,
    config: &FileConfig,
) {
    print!(
        "{}",
        ConsoleFormatter::format_batch(
            summary,
            settings,
            consensus.agent_count,
            &config.paths.output_dir
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_file_config() {
        let cli = Cli::try_parse_from([
            "footing-quorum",
            "--provider",
            "gemini",
            "--model",
            "gemini-2.0-flash",
            "--retries",
            "4",
            "--agents",
            "5",
            "--output-dir",
            "out",
            "--output",
            "json",
        ])
        .unwrap();

        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.provider.kind, "gemini");
        assert_eq!(config.provider.model.as_deref(), Some("gemini-2.0-flash"));
        assert_eq!(config.consensus.max_retries, 4);
        assert_eq!(config.consensus.agent_count, 5);
        assert_eq!(config.paths.output_dir.to_string_lossy(), "out");
        assert_eq!(config.output.format, Some(OutputFormat::Json));
        assert_eq!(config.paths.input_dir.to_string_lossy(), "input");
    }

    #[test]
    fn test_no_color_flag_disables_color() {
        let mut config = FileConfig::default();
        assert!(config.output.color);

        let cli = Cli::try_parse_from(["footing-quorum", "--no-color"]).unwrap();
        apply_cli_overrides(&mut config, &cli);
        assert!(!config.output.color);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["footing-quorum"]).unwrap();
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config, FileConfig::default());
    }
}
