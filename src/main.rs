//! vz entry point.
//! Parses arguments, loads configuration and dispatches to project
//! creation, update checking or self-update detection.

use std::path::PathBuf;

use vibezip::{
    cli::{get_args, Args},
    commands::ShellRunner,
    config::{load_config, Settings},
    error::{default_error_handler, Error, Result},
    loader::{load_document, DocumentSource, Fetcher, HttpFetcher},
    logger::init_logger,
    materializer::{MaterializeReport, Materializer},
    metadata::OutputMode,
    parser::parse_document,
    prompt::{DialoguerPrompter, Prompter},
    selfupdate::{compare_self, SelfUpdateStatus},
    update::{UpdateChecker, UpdateOutcome},
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = load_config(args.config.as_deref(), &cwd)?;
    let settings = Settings::resolve(&args, config);

    let fetcher = HttpFetcher::new(settings.timeout)?;
    let prompt = DialoguerPrompter::new();
    let runner = ShellRunner::default();
    let materializer =
        Materializer::new(&fetcher, &prompt, &runner, settings.materialize_options());

    if args.self_update {
        return self_update(&fetcher, &prompt, &settings);
    }

    if args.check_update {
        let checker = UpdateChecker::new(&fetcher, &materializer, settings.backup);
        match checker.check(&args.project_dir) {
            Ok(UpdateOutcome::UpToDate { local, remote }) => {
                println!("Project is up to date (local {local}, remote {remote}).");
            }
            Ok(UpdateOutcome::Updated { from, to, snapshot, report }) => {
                if let Some(snapshot) = snapshot {
                    println!("Snapshot: '{}'", snapshot.display());
                }
                print_report(&report);
                println!("Updated from {from} to {to}.");
            }
            // Update checks never fail the process.
            Err(e) => eprintln!("Update check failed: {e}"),
        }
        return Ok(());
    }

    let Some(source) = args.source.as_deref() else {
        return Ok(());
    };
    let source = DocumentSource::from_string(source);
    println!("Using document from the {}", source);

    let raw = load_document(&fetcher, &source)?;
    let doc = parse_document(&raw)?;
    let mode = if args.zip { OutputMode::Zip } else { OutputMode::Folder };
    let report = materializer.materialize(&doc, mode, &args.output_dir)?;

    print_report(&report);
    println!(
        "Project '{}' created successfully in {}.",
        doc.project_name,
        report.destination.display()
    );
    Ok(())
}

fn print_report(report: &MaterializeReport) {
    for path in &report.written {
        println!("Created: '{}'", path);
    }
    if let Some(script) = &report.script {
        println!("Install script: '{}'", script);
    }
    for failed in &report.failed {
        eprintln!("Failed: '{}': {}", failed.path, failed.reason);
    }
}

/// Compares the running binary with the configured remote copy and, if the
/// operator agrees, stores the candidate next to it for a manual swap.
fn self_update(fetcher: &dyn Fetcher, prompt: &dyn Prompter, settings: &Settings) -> Result<()> {
    let url = settings
        .self_update_url
        .as_deref()
        .ok_or_else(|| Error::ConfigError("self_update_url is not configured".to_string()))?;

    let exe = std::env::current_exe()?;
    let local = std::fs::read(&exe)?;
    let remote = fetcher.fetch_bytes(url)?;

    match compare_self(&local, &remote) {
        SelfUpdateStatus::Identical => println!("vz is up to date."),
        SelfUpdateStatus::UpdateAvailable { local_hash, remote_hash } => {
            println!("A different vz is available ({local_hash} -> {remote_hash}).");
            if prompt.confirm(settings.auto_confirm, "Download it now?".to_string())? {
                let mut candidate = exe.clone().into_os_string();
                candidate.push(".update");
                let candidate = PathBuf::from(candidate);
                std::fs::write(&candidate, remote)?;
                println!(
                    "Saved to '{}'. Replace '{}' with it and run vz again.",
                    candidate.display(),
                    exe.display()
                );
            }
        }
    }
    Ok(())
}
