// NoteKit - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (before logging, problems reported after)
// 3. Logging initialisation (debug mode support)
// 4. Subcommand dispatch

use clap::{Parser, Subcommand, ValueEnum};
use notekit::app::navigation::{ExternalEditor, ExternalWorkspace, TimestampPanel};
use notekit::app::subdivider::SubdivideOptions;
use notekit::app::vault::VaultOptions;
use notekit::app::{renamer, scan, subdivider, vault};
use notekit::core::export::{self, DocumentMatches};
use notekit::core::numbering::GapStrategy;
use notekit::core::scanner;
use notekit::platform::config::{self, AppConfig, PlatformPaths};
use notekit::platform::fs;
use notekit::platform::launcher::{self, ProcessLauncher};
use notekit::ui::timestamp_list;
use notekit::util::constants;
use notekit::util::error::{ExportError, NoteKitError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// NoteKit - utilities for markdown note vaults.
///
/// Scan notes for timestamps, number files and folders, split documents by
/// heading, and open directories as vaults.
#[derive(Parser, Debug)]
#[command(name = "notekit", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List timestamps found in notes.
    Scan {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the configured editor at a timestamp (1-based index from `scan`).
    Goto { file: PathBuf, index: usize },

    /// Give a file or folder the next auto-increment prefix.
    Number {
        path: PathBuf,

        /// How to number when the directory has gaps.
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,
    },

    /// Remove the auto-increment prefix from a file or folder.
    Unnumber { path: PathBuf },

    /// Split a document into one file per heading.
    Subdivide {
        file: PathBuf,

        /// Heading level to split at (default: shallowest present).
        #[arg(short, long)]
        level: Option<u8>,

        /// Output folder name (default: document name).
        #[arg(short, long)]
        name: Option<String>,

        /// Do not prefix section files with numbers.
        #[arg(long)]
        no_number: bool,

        /// Write into an existing output folder.
        #[arg(long)]
        force: bool,

        /// Show the files that would be written.
        #[arg(long)]
        dry_run: bool,
    },

    /// Open a directory as a vault in a new instance.
    OpenVault {
        dir: PathBuf,

        /// Vault whose configuration seeds a new vault.
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Plugins to keep (glob, repeatable; default all).
        #[arg(long)]
        include: Vec<String>,

        /// Plugins to drop (glob, repeatable).
        #[arg(long)]
        exclude: Vec<String>,

        /// Re-open the source vault afterwards.
        #[arg(long)]
        relaunch: bool,

        /// Only list the source vault's plugins.
        #[arg(long)]
        list_plugins: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum StrategyArg {
    FillGap,
    Append,
    ReincrementAll,
}

impl From<StrategyArg> for GapStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::FillGap => GapStrategy::FillGap,
            StrategyArg::Append => GapStrategy::Append,
            StrategyArg::ReincrementAll => GapStrategy::ReincrementAll,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read first so its logging section can shape the subscriber.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (app_config, config_problems) = config::load_config(&config_path);

    notekit::util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );
    tracing::debug!(
        version = constants::APP_VERSION,
        config = %config_path.display(),
        "NoteKit starting"
    );
    for problem in &config_problems {
        tracing::warn!(error = %problem, "Configuration warning");
    }

    match run(cli.command, &app_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Scan {
            paths,
            format,
            output,
        } => run_scan(&paths, format, output.as_deref()),
        Command::Goto { file, index } => run_goto(&file, index, config),
        Command::Number { path, strategy } => {
            let outcome =
                renamer::number_path(&path, strategy.map(GapStrategy::from), config.number_pad_width)?;
            for (from, to) in &outcome.renamed {
                println!("{} -> {}", from.display(), to.display());
            }
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            Ok(())
        }
        Command::Unnumber { path } => {
            let to = renamer::unnumber_path(&path)?;
            println!("{} -> {}", path.display(), to.display());
            Ok(())
        }
        Command::Subdivide {
            file,
            level,
            name,
            no_number,
            force,
            dry_run,
        } => {
            let options = SubdivideOptions {
                level,
                folder_name: name,
                auto_increment: config.section_auto_increment && !no_number,
                pad_width: config.section_pad_width,
                overwrite: force,
                dry_run,
                names: None,
            };
            let outcome = subdivider::subdivide(&file, &options)?;
            let verb = if outcome.written { "wrote" } else { "would write" };
            for (path, section) in outcome.files.iter().zip(&outcome.sections) {
                println!("{verb} {} (line {})", path.display(), section.line_number);
            }
            Ok(())
        }
        Command::OpenVault {
            dir,
            source,
            include,
            exclude,
            relaunch,
            list_plugins,
        } => {
            let options = VaultOptions {
                config_dir: config.vault_config_dir.clone(),
                source: source.or_else(|| config.source_vault.clone()),
                include,
                exclude,
                relaunch_source: relaunch,
                relaunch_delay: Duration::from_millis(config.relaunch_delay_ms),
            };
            if list_plugins {
                let vault_dir = options.source.as_deref().unwrap_or(&dir);
                for plugin in vault::list_plugins(vault_dir, &options.config_dir)? {
                    println!("{plugin}");
                }
                return Ok(());
            }
            let launcher = ProcessLauncher::new(config.host_executable.clone());
            let outcome = vault::open_path(&dir, &options, &launcher)?;
            if outcome.initialised {
                println!(
                    "Initialised {} ({} files copied, {} plugins kept, {} removed)",
                    outcome.path.display(),
                    outcome.copied_files,
                    outcome.kept_plugins.len(),
                    outcome.removed_plugins.len()
                );
            } else {
                println!("Opened {}", outcome.path.display());
            }
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            Ok(())
        }
    }
}

fn run_scan(paths: &[PathBuf], format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let report = scan::scan_paths(paths);
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }

    match output {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
            write_report(&report.documents, format, io::BufWriter::new(file), path)
        }
        None => write_report(
            &report.documents,
            format,
            io::stdout().lock(),
            Path::new("<stdout>"),
        ),
    }
}

fn write_report<W: Write>(
    documents: &[DocumentMatches],
    format: OutputFormat,
    mut out: W,
    out_path: &Path,
) -> Result<()> {
    let io_err = |e: io::Error| ExportError::Io {
        path: out_path.to_path_buf(),
        source: e,
    };
    match format {
        OutputFormat::Text => {
            timestamp_list::render_all(&mut out, documents).map_err(io_err)?;
            out.flush().map_err(io_err)?;
        }
        OutputFormat::Json => {
            export::export_json(documents, &mut out, out_path)?;
            writeln!(out).map_err(io_err)?;
        }
        OutputFormat::Csv => {
            export::export_csv(documents, &mut out, out_path)?;
        }
    }
    Ok(())
}

/// Navigation problems are reported and never fail the command.
fn run_goto(file: &Path, index: usize, config: &AppConfig) -> Result<()> {
    let text = fs::read_file_lossy(file).map_err(|e| NoteKitError::Io {
        path: file.to_path_buf(),
        operation: "read",
        source: e,
    })?;

    let mut panel = TimestampPanel::new();
    panel.set_matches(scanner::scan_for_timestamps(&text), file);

    let command = config
        .editor_command
        .clone()
        .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| constants::DEFAULT_EDITOR_COMMAND.to_string());
    let (program, mut args) = launcher::split_command(&command)
        .unwrap_or_else(|| (constants::DEFAULT_EDITOR_COMMAND.to_string(), Vec::new()));
    args.extend(config.editor_args.iter().cloned());
    let editor = ExternalEditor::new(program, args, file);
    let mut workspace = ExternalWorkspace::new(editor);

    let result = panel.activate(&mut workspace, index).map_err(NoteKitError::from).and_then(|()| {
        match workspace.editor_mut().take_launch_error() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    });
    if let Err(e) = result {
        tracing::warn!(error = %e, "Navigation failed");
        eprintln!("warning: {e}");
    }
    Ok(())
}
