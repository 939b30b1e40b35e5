//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use docpack_core::rustdoc;
use docpack_core::{BuildProgress, BuildSummary, DocsetRequest, build_docset};
use docpack_shared::{AppConfig, load_config_from, validate_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docpack — package rendered documentation into a searchable docset.
#[derive(Parser)]
#[command(
    name = "docpack",
    version,
    about = "Package rendered API documentation into a searchable docset bundle.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build a docset from a documentation tree.
    ///
    /// Command-line paths override the corresponding config values.
    /// Warning: the output directory is cleaned before the build.
    Build {
        /// Documentation source directory (overrides [docset.doc_dir]).
        #[arg(long)]
        doc_dir: Option<String>,

        /// Output directory (overrides [docset.out_dir]).
        #[arg(long)]
        out_dir: Option<String>,

        /// Path to the configuration file.
        #[arg(long, default_value = "docpack.toml")]
        conf: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize a docpack.toml with defaults in the current directory.
    Init,
    /// Show the resolved configuration.
    Show {
        /// Path to the configuration file.
        #[arg(long, default_value = "docpack.toml")]
        conf: String,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docpack=info",
        1 => "docpack=debug",
        _ => "docpack=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            doc_dir,
            out_dir,
            conf,
        } => cmd_build(doc_dir.as_deref(), out_dir.as_deref(), &conf).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show { conf } => cmd_config_show(&conf),
        },
    }
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

async fn cmd_build(doc_dir: Option<&str>, out_dir: Option<&str>, conf: &str) -> Result<()> {
    let conf_path = std::fs::canonicalize(conf)
        .map_err(|_| eyre!("there is no configuration at path {conf}"))?;

    let config = load_config_from(&conf_path)?;
    validate_config(&config)?;

    let root_dir = conf_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let source_root = resolve_dir(doc_dir, config.docset.doc_dir.as_deref(), &root_dir, ".");
    let out_dir = resolve_dir(out_dir, config.docset.out_dir.as_deref(), &root_dir, "ds_out");

    if !source_root.is_dir() {
        return Err(eyre!(
            "documentation directory {} does not exist",
            source_root.display()
        ));
    }

    // The output directory is rebuilt from scratch.
    if out_dir.exists() {
        if out_dir.is_dir() {
            std::fs::remove_dir_all(&out_dir)?;
        } else {
            return Err(eyre!("output dir points to a file!"));
        }
    }
    std::fs::create_dir_all(&out_dir)?;

    let rules = rustdoc::default_rules()?;
    let request = DocsetRequest {
        info: config.docset_info(),
        icon: config
            .docset
            .icon
            .as_deref()
            .map(|icon| ensure_abs(icon, &root_dir)),
        source_root: source_root.clone(),
        out_dir,
        rules: &rules,
        kinds: config.kind_map(rustdoc::kind_map()),
        titles: config.title_map(),
    };

    info!(
        doc_dir = %source_root.display(),
        docset = %config.docset.name,
        "building docset"
    );

    let reporter = CliProgress::new();
    let result = build_docset(request, &reporter).await?;

    println!();
    println!("  Docset built successfully!");
    println!("  Name:    {}", config.docset.name);
    println!("  Symbols: {}", result.build.symbols);
    println!("  Files:   {}", result.build.files_processed);
    println!("  Path:    {}", result.docset_path.display());
    println!("  Time:    {:.1}s", result.build.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Resolve a directory from flag → config → default, warning about fallback
/// defaults so a bare invocation is not a surprise.
fn resolve_dir(
    flag: Option<&str>,
    configured: Option<&str>,
    root_dir: &Path,
    default: &str,
) -> PathBuf {
    match (flag, configured) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(dir)) => ensure_abs(dir, root_dir),
        (None, None) => {
            let fallback = ensure_abs(default, root_dir);
            tracing::warn!(dir = %fallback.display(), "directory not specified, using default");
            fallback
        }
    }
}

/// Resolve a possibly-relative path against the config file's directory.
fn ensure_abs(path: &str, prefix: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        prefix.join(path)
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl BuildProgress for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_processed(&self, rel_path: &str, current: usize) {
        self.spinner
            .set_message(format!("[{current}] {rel_path}"));
    }

    fn done(&self, _summary: &BuildSummary) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = docpack_shared::init_config(&cwd)?;
    println!("created {}", path.display());
    Ok(())
}

fn cmd_config_show(conf: &str) -> Result<()> {
    let path = Path::new(conf);
    let config: AppConfig = if path.exists() {
        load_config_from(path)?
    } else {
        AppConfig::default()
    };
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
