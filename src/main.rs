//! Posture: SOC 2 readiness assessment CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use posture::assessment::AggregateStats;
use posture::config::{load_config, write_starter_config, CONFIG_FILENAME, DEFAULT_PORT};
use posture::reporter::{ConsoleReporter, HtmlReporter, JsonReporter};
use posture::{AssessmentEngine, Report, Submission};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// Posture: SOC 2 readiness questionnaire scoring and reports
#[derive(Parser, Debug)]
#[command(name = "posture")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Submission file, or directory of *.json submissions (omit when using a subcommand)
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output the structured report as JSON
    #[arg(long, short, conflicts_with_all = ["html", "response"])]
    json: bool,

    /// Output a standalone HTML document
    #[arg(long, conflicts_with = "response")]
    html: bool,

    /// Output exactly what POST /submit would return
    #[arg(long)]
    response: bool,

    /// Write output to a file (a directory for --html with several submissions)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Minimum overall score (exit 1 if below)
    #[arg(long, value_name = "SCORE")]
    fail_under: Option<f64>,

    /// Quiet mode (one line per submission)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (all recommendations and the conclusion)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .posturerc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Assess in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .posturerc.json with sensible defaults
    Init {
        /// Port the server should listen on
        #[arg(long)]
        port: Option<u16>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Write a sample submission to fill in
    Template {
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// One assessed submission file
struct Assessed {
    path: PathBuf,
    report: Report,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::Init { port, dir } => run_init(port, dir.as_deref()),
            Commands::Template { output } => run_template(output.as_deref()),
        };
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a submission path is required");
    };

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.fail_under);

    let files = collect_submission_files(&path)?;
    if files.is_empty() {
        eprintln!("{}: No submission files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = AssessmentEngine::new();
    let use_parallel = args.parallel || args.jobs.is_some() || files.len() > 10;
    log::info!(
        "assessing {} submission(s){}",
        files.len(),
        if use_parallel { " in parallel" } else { "" }
    );

    let (assessed, had_errors) = if use_parallel {
        assess_files_parallel(&engine, &files, args.quiet)
    } else {
        assess_files_sequential(&engine, &files, args.quiet)
    };

    if assessed.is_empty() {
        eprintln!("{}: All submissions failed to assess", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let reports: Vec<Report> = assessed.iter().map(|a| a.report.clone()).collect();
    let stats = AssessmentEngine::aggregate_stats(&reports);

    if args.html {
        write_html(&assessed, args.output.as_deref(), args.quiet)?;
    } else if args.response {
        let reporter = JsonReporter::new();
        let lines: Vec<String> = reports.iter().map(|r| reporter.submit_response(r)).collect();
        emit(&lines.join("\n"), args.output.as_deref(), args.quiet)?;
    } else if args.json {
        let reporter = JsonReporter::new().pretty();
        let json = if reports.len() == 1 {
            reporter.report(&reports[0])
        } else {
            reporter.report_with_summary(&reports, &stats)
        };
        emit(&json, args.output.as_deref(), args.quiet)?;
    } else if let Some(output) = args.output.as_deref() {
        let text = render_console(&reports, &stats, args.quiet, args.verbose);
        emit(&text, Some(output), args.quiet)?;
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if args.quiet {
            for report in &reports {
                reporter.report_quiet(report);
            }
        } else if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
    }

    // Check minimum score (config or CLI)
    if let Some(fail_under) = config.fail_under {
        let score = if reports.len() == 1 {
            reports[0].overall_score
        } else {
            stats.average_score
        };

        if score < fail_under {
            if !args.quiet && !args.json && !args.response {
                eprintln!(
                    "\n{}: Score {:.2} is below minimum {}",
                    "Failed".red().bold(),
                    score,
                    fail_under
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_init(port: Option<u16>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let written = write_starter_config(dir, port.unwrap_or(DEFAULT_PORT))?;
    println!("{}: Created {}", "Info".blue(), written.display());
    Ok(ExitCode::SUCCESS)
}

fn run_template(output: Option<&Path>) -> Result<ExitCode> {
    let json = serde_json::to_string_pretty(&Submission::sample())?;
    match output {
        Some(path) => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write template to {}", path.display()))?;
            eprintln!("{}: Template written to {}", "Info".blue(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}

/// Print to stdout, or write to `output` when given
fn emit(content: &str, output: Option<&Path>, quiet: bool) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                eprintln!("{}: Output written to {}", "Info".blue(), path.display());
            }
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn render_console(reports: &[Report], stats: &AggregateStats, quiet: bool, verbose: bool) -> String {
    let mut reporter = ConsoleReporter::new().without_colors();
    if verbose {
        reporter = reporter.verbose();
    }
    if quiet {
        return reports
            .iter()
            .map(|r| reporter.render_quiet(r))
            .collect::<Vec<_>>()
            .join("\n");
    }
    let mut text: String = reports
        .iter()
        .map(|r| reporter.render(r))
        .collect::<Vec<_>>()
        .join(format!("{}\n", "─".repeat(60)).as_str());
    if reports.len() > 1 {
        text.push_str(&reporter.render_summary(stats));
    }
    text
}

/// Standalone HTML: one document on stdout or in the output file, or one
/// `<stem>.html` per submission when several are written to a directory.
fn write_html(assessed: &[Assessed], output: Option<&Path>, quiet: bool) -> Result<()> {
    let reporter = HtmlReporter::new().standalone();

    if let [single] = assessed {
        return emit(&reporter.report(&single.report), output, quiet);
    }

    let Some(dir) = output else {
        anyhow::bail!("--html with several submissions needs --output <DIR>");
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    for item in assessed {
        let target = dir.join(html_file_name(&item.path));
        fs::write(&target, reporter.report(&item.report))
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }
    if !quiet {
        eprintln!(
            "{}: {} reports written to {}",
            "Info".blue(),
            assessed.len(),
            dir.display()
        );
    }
    Ok(())
}

fn html_file_name(submission: &Path) -> PathBuf {
    let stem = submission
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    PathBuf::from(format!("{}.html", stem))
}

fn collect_submission_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_submission_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    // Sort for consistent output
    files.sort();

    Ok(files)
}

fn is_submission_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    // The config file lives next to submissions but is not one
    name.ends_with(".json") && name != CONFIG_FILENAME
}

fn assess_file(engine: &AssessmentEngine, file: &Path) -> Result<Report> {
    let body = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let report = engine.assess_json(&body)?;
    Ok(report)
}

/// Assess files one after another
fn assess_files_sequential(
    engine: &AssessmentEngine,
    files: &[PathBuf],
    quiet: bool,
) -> (Vec<Assessed>, bool) {
    let mut assessed = Vec::new();
    let mut had_errors = false;

    for file in files {
        match assess_file(engine, file) {
            Ok(report) => assessed.push(Assessed {
                path: file.clone(),
                report,
            }),
            Err(e) => {
                if !quiet {
                    eprintln!(
                        "{}: Failed to assess {}: {:#}",
                        "Error".red(),
                        file.display(),
                        e
                    );
                }
                had_errors = true;
            }
        }
    }

    (assessed, had_errors)
}

/// Assess files in parallel
fn assess_files_parallel(
    engine: &AssessmentEngine,
    files: &[PathBuf],
    quiet: bool,
) -> (Vec<Assessed>, bool) {
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    let had_errors = AtomicBool::new(false);

    let assessed: Vec<_> = files
        .par_iter()
        .filter_map(|file| match assess_file(engine, file) {
            Ok(report) => Some(Assessed {
                path: file.clone(),
                report,
            }),
            Err(e) => {
                had_errors.store(true, Ordering::Relaxed);
                if !quiet {
                    eprintln!(
                        "{}: Failed to assess {}: {:#}",
                        "Error".red(),
                        file.display(),
                        e
                    );
                }
                None
            }
        })
        .collect();

    (assessed, had_errors.load(Ordering::Relaxed))
}
