//! CLI entry point for `spoolcheck`.

use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use spoolcheck::config::Config;
use spoolcheck::i18n;
use spoolcheck::model::query::MatchQuery;
use spoolcheck::model::report::MessageReport;
use spoolcheck::parser::{parse_and_extract, spool as spool_parser};
use spoolcheck::search::matcher::Matcher;
use spoolcheck::store::lifecycle;
use spoolcheck::store::spool::{read_message, MessageSource, ScanOptions, SpoolDir};

#[derive(Parser)]
#[command(name = "spoolcheck", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Language (en, es). Defaults to system locale.
    #[arg(long, value_name = "LANG", global = true)]
    lang: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for an email with a subject and content
    Check {
        /// Expected subject (exact match)
        subject: String,
        /// Text that must appear in the email content (repeatable)
        #[arg(short, long = "content", value_name = "TEXT")]
        content: Vec<String>,
        /// Spool directory
        #[arg(short, long, env = "SPOOLCHECK_DIR")]
        dir: Option<PathBuf>,
        /// Succeed only if no such email exists
        #[arg(long)]
        absent: bool,
        /// Print a per-email breakdown
        #[arg(long)]
        explain: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List spooled emails
    List {
        /// Spool directory
        #[arg(short, long, env = "SPOOLCHECK_DIR")]
        dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one spool file
    Show {
        /// Spool file to inspect
        file: PathBuf,
    },
    /// Create and empty the spool directory
    Prepare {
        /// Spool directory
        #[arg(short, long, env = "SPOOLCHECK_DIR")]
        dir: Option<PathBuf>,
    },
    /// Remove spooled emails
    Purge {
        /// Spool directory
        #[arg(short, long, env = "SPOOLCHECK_DIR")]
        dir: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

/// Detect language early from --lang arg or system env, before clap processes --help.
fn detect_lang_early() -> i18n::Lang {
    let args: Vec<String> = std::env::args().collect();
    for (i, arg) in args.iter().enumerate() {
        let code = if arg == "--lang" {
            args.get(i + 1).map(String::as_str)
        } else {
            arg.strip_prefix("--lang=")
        };
        if let Some(lang) = code.and_then(i18n::Lang::from_code) {
            return lang;
        }
    }
    i18n::detect_system_lang()
}

/// Build a localized clap Command using i18n strings.
fn build_localized_command() -> clap::Command {
    let mut cmd = Cli::command()
        .about(i18n::app_about())
        .long_about(i18n::app_long_about());

    let localized = [
        ("check", i18n::help_cmd_check()),
        ("list", i18n::help_cmd_list()),
        ("show", i18n::help_cmd_show()),
        ("prepare", i18n::help_cmd_prepare()),
        ("purge", i18n::help_cmd_purge()),
        ("completions", i18n::help_cmd_completions()),
        ("manpage", i18n::help_cmd_manpage()),
    ];
    for (name, about) in localized {
        cmd = cmd.mut_subcommand(name, |sub| sub.about(about));
    }

    cmd
}

fn main() -> anyhow::Result<()> {
    // Detect language BEFORE clap parsing so --help is localized
    i18n::set_lang(detect_lang_early());

    let matches = build_localized_command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let config = spoolcheck::config::load_config();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Check {
            subject,
            content,
            dir,
            absent,
            explain,
            json,
        } => {
            let query = MatchQuery::new(subject).fragments(content);
            cmd_check(&config, dir, &query, absent, explain, json)
        }
        Commands::List { dir, json } => cmd_list(&config, dir, json),
        Commands::Show { file } => cmd_show(&config, &file),
        Commands::Prepare { dir } => cmd_prepare(&config, dir),
        Commands::Purge { dir } => cmd_purge(&config, dir),
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = spoolcheck::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "spoolcheck.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Resolve the spool directory from the command line or the config file.
fn resolve_dir(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    dir.or_else(|| config.general.spool_dir.clone())
        .ok_or_else(|| anyhow::anyhow!("{}", i18n::err_no_spool_dir()))
}

fn open_spool(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<SpoolDir> {
    let path = resolve_dir(config, dir)?;
    Ok(SpoolDir::open(path, ScanOptions::from(&config.scan))?)
}

/// Look for a matching email and fail unless the expectation holds.
fn cmd_check(
    config: &Config,
    dir: Option<PathBuf>,
    query: &MatchQuery,
    absent: bool,
    explain: bool,
    json: bool,
) -> anyhow::Result<()> {
    let spool = open_spool(config, dir)?;
    let matcher = Matcher::from_config(&config.extract)?;

    let (found, reports) = if explain {
        let reports = matcher.explain(query, &spool)?;
        (reports.iter().any(MessageReport::is_match), Some(reports))
    } else {
        (matcher.find_match(query, &spool)?, None)
    };
    let ok = found != absent;

    if json {
        let output = serde_json::json!({
            "spool": spool.describe(),
            "subject": query.subject,
            "fragments": query.fragments,
            "expect_absent": absent,
            "found": found,
            "ok": ok,
            "reports": reports,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(reports) = &reports {
            print_reports(reports);
        }
        if found {
            println!("  {}", i18n::msg_email_found());
        } else {
            println!("  {}", i18n::msg_email_not_found());
        }
    }

    if !ok {
        let err = if absent {
            spoolcheck::error::SpoolError::UnexpectedMatch {
                subject: query.subject.clone(),
            }
        } else {
            spoolcheck::error::SpoolError::NoMatchingMessage {
                subject: query.subject.clone(),
            }
        };
        return Err(anyhow::Error::new(err).context(i18n::err_expectation_failed()));
    }
    Ok(())
}

/// Print the per-email breakdown produced by `--explain`.
fn print_reports(reports: &[MessageReport]) {
    println!();
    for report in reports {
        let mut notes: Vec<String> = Vec::new();
        if !report.subject_matches {
            notes.push(i18n::msg_subject_mismatch().to_string());
        }
        if !report.has_html_body {
            notes.push(i18n::msg_no_html_body().to_string());
        }
        for fragment in &report.missing_fragments {
            notes.push(format!("{} {:?}", i18n::msg_missing(), fragment));
        }
        if notes.is_empty() {
            notes.push(i18n::msg_matches().to_string());
        }

        println!("  {}", report.path.display());
        println!("    {:<10} {}", i18n::msg_subject(), report.subject);
        println!("    {}", notes.join("; "));
    }
    println!();
}

/// List spooled emails with size, modification time and subject.
fn cmd_list(config: &Config, dir: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    use humansize::{format_size, BINARY};

    let spool = open_spool(config, dir)?;

    let mut rows = Vec::new();
    for raw in spool.messages()? {
        let raw = raw?;
        let meta = std::fs::metadata(&raw.path)?;
        let modified = meta
            .modified()
            .ok()
            .map(chrono::DateTime::<chrono::Local>::from);
        let subject = spool_parser::extract_subject(&raw.text);
        rows.push((raw.path, meta.len(), modified, subject));
    }

    if json {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|(path, size, modified, subject)| {
                serde_json::json!({
                    "file": path.to_string_lossy(),
                    "size": size,
                    "modified": modified.map(|m| m.to_rfc3339()),
                    "subject": subject,
                })
            })
            .collect();
        let output = serde_json::json!({
            "spool": spool.describe(),
            "count": rows.len(),
            "emails": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", rows.len(), i18n::msg_emails());
    if rows.is_empty() {
        println!();
        return Ok(());
    }
    println!();
    println!(
        "  {:<32} {:>9} {:<17} {}",
        i18n::msg_file(),
        i18n::msg_size(),
        i18n::msg_modified(),
        i18n::msg_subject()
    );
    println!("  {}", "-".repeat(98));
    for (path, size, modified, subject) in &rows {
        let name = path
            .strip_prefix(spool.path())
            .unwrap_or(path)
            .to_string_lossy();
        let name_trunc: String = name.chars().take(31).collect();
        let date = modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "  {:<32} {:>9} {:<17} {}",
            name_trunc,
            format_size(*size, BINARY),
            date,
            subject
        );
    }
    println!();
    Ok(())
}

/// Print what the matcher sees for one spool file.
fn cmd_show(config: &Config, file: &Path) -> anyhow::Result<()> {
    if !file.is_file() {
        anyhow::bail!("{}: {}", i18n::err_file_not_found(), file.display());
    }

    let matcher = Matcher::from_config(&config.extract)?;
    let (message, content) = parse_and_extract(read_message(file)?, matcher.extractor());

    println!();
    println!("  {:<10} {}", i18n::msg_file(), message.path.display());
    println!("  {:<10} {}", i18n::msg_subject(), message.subject);
    let regions: Vec<&str> = matcher.extractor().region_names().collect();
    println!("  {:<10} {}", i18n::msg_regions(), regions.join(", "));
    if !message.has_html_body() {
        println!("  {:<10} ({})", i18n::msg_content(), i18n::msg_no_html_body());
    } else {
        println!("  {}:", i18n::msg_content());
        println!();
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            println!("    {line}");
        }
    }
    println!();
    Ok(())
}

fn cmd_prepare(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let path = resolve_dir(config, dir)?;
    let spool = lifecycle::prepare(&path, ScanOptions::from(&config.scan))?;
    println!("  {}: {}", i18n::msg_prepared(), spool.path().display());
    Ok(())
}

fn cmd_purge(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<()> {
    let spool = open_spool(config, dir)?;
    let removed = lifecycle::purge(&spool)?;
    println!("  {} {} {}", i18n::msg_purged(), removed, i18n::msg_emails());
    Ok(())
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "spoolcheck", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
