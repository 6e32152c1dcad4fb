use anyhow::{Context, Result};
use docfill_config::{Config, PipelineSettings, ShareRole};
use docfill_engine::io::google::{DEFAULT_DOCS_BASE_URL, DEFAULT_DRIVE_BASE_URL};
use docfill_engine::{
    DeploymentMode, DocumentId, GenerateRequest, GoogleDocsStore, GoogleDrive, LocalStore,
    Pipeline, PipelineError, PipelineInput, PipelineOptions, ResumeRecord, Role, acquire_token,
    generate, title_for,
};
use std::path::{Path, PathBuf};
use std::{env, process};

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Fill a copy of the configured template document
    Remote { record: PathBuf },
    /// Fill a plain-text template in memory and print the result
    Local { template: PathBuf, record: PathBuf },
}

fn parse_args(args: &[String]) -> Option<Command> {
    match args {
        [_, flag, template, record] if flag == "--local" => Some(Command::Local {
            template: PathBuf::from(template),
            record: PathBuf::from(record),
        }),
        [_, record] if !record.starts_with("--") => Some(Command::Remote {
            record: PathBuf::from(record),
        }),
        _ => None,
    }
}

fn usage(program: &str) {
    eprintln!("Usage: {program} <record.json>");
    eprintln!("       {program} --local <template.txt> <record.json>");
}

fn pipeline_options(settings: &PipelineSettings) -> PipelineOptions {
    PipelineOptions {
        batch_delay: settings.batch_delay(),
        marker_pass_ceiling: settings.marker_pass_ceiling,
        style_chunk_size: settings.style_chunk_size,
    }
}

fn deployment_mode(mode: docfill_config::DeploymentMode) -> DeploymentMode {
    match mode {
        docfill_config::DeploymentMode::Local => DeploymentMode::Local,
        docfill_config::DeploymentMode::Cloud => DeploymentMode::Cloud,
    }
}

fn share_role(role: ShareRole) -> Role {
    match role {
        ShareRole::Reader => Role::Reader,
        ShareRole::Writer => Role::Writer,
        ShareRole::Commenter => Role::Commenter,
    }
}

fn load_record(path: &Path) -> Result<ResumeRecord> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record file {}", path.display()))?;
    ResumeRecord::from_json(&json)
        .with_context(|| format!("Failed to parse record file {}", path.display()))
}

fn run_local(template: &Path, record: &Path) -> Result<()> {
    let text = std::fs::read_to_string(template)
        .with_context(|| format!("Failed to read template {}", template.display()))?;
    let record = load_record(record)?;

    // Throttling only matters for the remote API
    let mut options = match Config::load()? {
        Some(config) => pipeline_options(&config.pipeline),
        None => PipelineOptions::default(),
    };
    options.batch_delay = std::time::Duration::ZERO;

    let store = LocalStore::new();
    let id = store.insert("local", &text);
    let report = Pipeline::new(&store, options).run(&id, &PipelineInput::from_record(&record))?;
    for anomaly in &report.anomalies {
        log::warn!("{anomaly}");
    }
    log::info!("applied {} batches", report.batches());

    let rendered = store
        .render_marked(&id)
        .context("Local document disappeared during the run")?;
    print!("{rendered}");
    Ok(())
}

fn run_remote(config: &Config, record: &Path) -> Result<()> {
    let record = load_record(record)?;

    let token = acquire_token(
        deployment_mode(config.deployment_mode),
        config.token_path.as_deref(),
    )
    .map_err(PipelineError::from)?;

    let docs = GoogleDocsStore::with_base_url(
        token.clone(),
        config
            .api
            .docs_base_url
            .as_deref()
            .unwrap_or(DEFAULT_DOCS_BASE_URL),
    )?;
    let drive = GoogleDrive::with_base_url(
        token,
        config
            .api
            .drive_base_url
            .as_deref()
            .unwrap_or(DEFAULT_DRIVE_BASE_URL),
    )?;

    let request = GenerateRequest {
        template: DocumentId::new(&config.template_document_id),
        title: title_for(&config.title_template, &record),
        share: config
            .share
            .as_ref()
            .map(|share| (share.principal.clone(), share_role(share.role))),
    };
    let pipeline = Pipeline::new(docs, pipeline_options(&config.pipeline));
    let generated = generate(&pipeline, &drive, &record, &request)?;

    if !generated.report.is_clean() {
        log::warn!("document generated with problems, check the log above");
    }
    println!("{}", generated.location);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("docfill-cli");

    let Some(command) = parse_args(&args) else {
        usage(program);
        process::exit(1);
    };

    match command {
        Command::Local { template, record } => run_local(&template, &record),
        Command::Remote { record } => {
            let config_path = Config::config_path();
            let config = match Config::load() {
                Ok(Some(config)) => config,
                Ok(None) => {
                    eprintln!("Error: No config file found");
                    eprintln!("Create a config file at {}", config_path.display());
                    usage(program);
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: Failed to load config file: {e}");
                    process::exit(1);
                }
            };
            log::info!("Using config from {}", config_path.display());
            run_remote(&config, &record)
        }
    }
}
