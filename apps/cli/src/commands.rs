//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use postcraft_core::{
    NextAction, Pipeline, PipelineStage, ProgressReporter, render_summary, save_bundle,
};
use postcraft_shared::{
    AppConfig, Settings, check_keys, config_file_path, init_config_at, load_config,
    load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// postcraft: research a topic and draft a publication-ready LinkedIn post.
#[derive(Parser)]
#[command(
    name = "postcraft",
    version,
    about = "Research a topic on the web and turn the findings into a LinkedIn post.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.postcraft/postcraft.toml.
    #[arg(long, global = true, env = "POSTCRAFT_CONFIG")]
    pub config: Option<PathBuf>,

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
    /// Research a topic and generate a post.
    Research {
        /// Topic to research (3-200 characters).
        topic: String,

        /// Directory for the output bundle (defaults to [output].dir).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Do not save the research report alongside the post.
        #[arg(long)]
        no_save_research: bool,

        /// Do not print the post and metadata.
        #[arg(long)]
        no_preview: bool,
    },

    /// Check that every required API key is set.
    ValidateConfig,

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
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "postcraft=info",
        1 => "postcraft=debug",
        _ => "postcraft=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Research {
            topic,
            output_dir,
            no_save_research,
            no_preview,
        } => {
            cmd_research(
                config_path,
                &topic,
                output_dir.as_deref(),
                no_save_research,
                no_preview,
            )
            .await
        }
        Command::ValidateConfig => cmd_validate_config(config_path),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn read_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    })
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_research(
    config_path: Option<&Path>,
    topic: &str,
    output_dir: Option<&Path>,
    no_save_research: bool,
    no_preview: bool,
) -> Result<()> {
    let config = read_config(config_path)?;
    let settings = Settings::resolve(&config)?;
    let pipeline = Pipeline::from_settings(&settings)?;

    info!(topic, model = %settings.model.name, "starting research");

    let reporter = CliProgress::new();
    let outcome = pipeline.execute(topic, &reporter).await;
    reporter.finish();
    let result = outcome?;

    if !no_preview {
        println!("{}", render_summary(&result));
    }

    let dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let save_research = config.output.save_research && !no_save_research;
    let paths = save_bundle(&result, &dir, save_research)?;

    println!("  Saved:");
    println!("  Post:     {}", paths.post.display());
    if let Some(research) = &paths.research {
        println!("  Research: {}", research.display());
    }
    println!("  Metadata: {}", paths.metadata.display());
    println!();

    Ok(())
}

fn cmd_validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = read_config(config_path)?;
    let checks = check_keys(&config);

    println!("Configuration check:");
    for check in &checks {
        let mark = if check.present { "✓" } else { "✗" };
        println!("  {mark} {} ({})", check.service, check.env_var);
    }

    let missing: Vec<&str> = checks
        .iter()
        .filter(|c| !c.present)
        .map(|c| c.env_var.as_str())
        .collect();

    if missing.is_empty() {
        println!("\nAll API keys configured.");
        Ok(())
    } else {
        Err(eyre!("missing API keys: {}", missing.join(", ")))
    }
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };
    init_config_at(&path)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = read_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: PipelineStage) {
        match stage {
            PipelineStage::Done | PipelineStage::Failed => {}
            other => self.spinner.set_message(format!("{other}...")),
        }
    }

    fn tool_used(&self, step: usize, action: &NextAction) {
        self.spinner
            .set_message(format!("Researching [step {step}] {action}"));
    }
}
