//! Command-line interface implementation for vibezip.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for vibezip.
#[derive(Parser, Debug)]
#[command(author, version, about = "vibezip: materialize a project document as a folder or zip archive", long_about = None)]
pub struct Args {
    /// Path or http(s) URL of the project document
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// Directory where the project folder or archive is created
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Create <project>.zip instead of a project folder.
    /// Commands are never executed in this mode, only bundled into the install script.
    #[arg(short, long)]
    pub zip: bool,

    /// Run every post-create command without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Copy existing files aside before overwriting them.
    /// With --check-update the whole project is copied before it is updated.
    #[arg(short, long)]
    pub backup: bool,

    /// Check the project at --project-dir for a newer version and update it
    #[arg(short = 'u', long, conflicts_with_all = ["source", "self_update"])]
    pub check_update: bool,

    /// Project folder or <project>.zip checked by --check-update
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub project_dir: PathBuf,

    /// Check whether a newer vz binary is available at the configured self_update_url
    #[arg(long, conflicts_with = "source")]
    pub self_update: bool,

    /// Tool configuration file (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Timeout in seconds for every network request
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if no document is given and no other action is requested
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) if args.source.is_none() && !args.check_update && !args.self_update => {
            print_help_and_exit()
        }
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                print_help_and_exit()
            } else {
                e.exit();
            }
        }
    }
}

fn print_help_and_exit() -> ! {
    let _ = Args::command()
        .help_template(
            r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
        )
        .print_help();
    std::process::exit(1);
}
