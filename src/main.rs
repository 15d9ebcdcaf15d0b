// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use subpolish::app_config::{self, Config, InputFormat};
use subpolish::app_controller::Controller;

/// CLI Wrapper for InputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliInputFormat {
    Subtitle,
    Caption,
}

impl From<CliInputFormat> for InputFormat {
    fn from(cli_format: CliInputFormat) -> Self {
        match cli_format {
            CliInputFormat::Subtitle => InputFormat::Subtitle,
            CliInputFormat::Caption => InputFormat::Caption,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean, reformat and name-translate subtitle files (default command)
    Process(ProcessArgs),

    /// List names left untranslated in the target-language lines
    Names(NamesArgs),

    /// Generate shell completions for subpolish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every processing command
#[derive(clap::Args, Debug, Clone)]
struct CommonArgs {
    /// Input file shape
    #[arg(long, value_enum)]
    format: Option<CliInputFormat>,

    /// Name dictionary file (`source = target` per line)
    #[arg(short, long)]
    dictionary: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(clap::Args, Debug)]
struct ProcessArgs {
    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory for output files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Skip the punctuation/lyrics/dialog reformat pass
    #[arg(long)]
    no_reformat: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(clap::Args, Debug)]
struct NamesArgs {
    /// Subtitle file to scan
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Append `Name = ` stubs for unmapped names to the dictionary file
    #[arg(short, long)]
    append: bool,

    #[command(flatten)]
    common: CommonArgs,
}

/// subpolish - bilingual subtitle cleanup
///
/// Cleans closed captions, normalizes punctuation, dialog and lyrics lines,
/// and translates proper names with a user-maintained dictionary.
#[derive(Parser, Debug)]
#[command(name = "subpolish")]
#[command(version)]
#[command(about = "Bilingual subtitle cleanup and name translation")]
#[command(long_about = "subpolish cleans and reformats bilingual subtitle files and closed-caption transcripts.

EXAMPLES:
    subpolish movie.srt                          # Reformat using default config
    subpolish -f movie.srt                       # Force overwrite existing output
    subpolish --format caption show.txt          # Clean a closed-caption transcript
    subpolish -d names.txt movie.srt             # Translate names with a dictionary
    subpolish names -d names.txt movie.srt       # List names still untranslated
    subpolish names -a -d names.txt movie.srt    # ...and append stubs to the dictionary
    subpolish completions bash > subpolish.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory for output files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Skip the punctuation/lyrics/dialog reformat pass
    #[arg(long)]
    no_reformat: bool,

    #[command(flatten)]
    common: CommonArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Logger starts at trace so the configured level can be applied later via set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subpolish", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args),
        Some(Commands::Names(args)) => run_names(args),
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_process(ProcessArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                no_reformat: cli.no_reformat,
                common: cli.common,
            })
        }
    }
}

fn run_process(options: ProcessArgs) -> Result<()> {
    let mut config = load_config(&options.common)?;
    if options.no_reformat {
        config.processing.reformat = false;
    }

    let controller = Controller::with_config(config)?;
    info!(
        "Processing {} input (reformat: {})",
        controller.config().input_format.display_name(),
        controller.config().processing.reformat
    );

    if options.input_path.is_file() {
        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf());

        if let Some(output_path) = controller.run(&options.input_path, &output_dir, options.force_overwrite)? {
            info!("Success: {:?}", output_path);
        }
    } else if options.input_path.is_dir() {
        if options.output_dir.is_some() {
            warn!("--output-dir is ignored for directories; outputs are written next to each input");
        }
        controller.run_folder(&options.input_path, options.force_overwrite)?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

fn run_names(options: NamesArgs) -> Result<()> {
    let config = load_config(&options.common)?;
    let controller = Controller::with_config(config)?;

    let names = controller.discover_names(&options.input_file)?;
    if names.is_empty() {
        info!("No untranslated names found in {:?}", options.input_file);
        return Ok(());
    }

    let mut stdout = std::io::stdout();
    for name in &names {
        writeln!(stdout, "{}", name)?;
    }

    if options.append {
        controller.append_name_stubs(&names)?;
    }

    Ok(())
}

// Load or create the configuration file, then apply CLI overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(format) = &options.format {
        config.input_format = format.clone().into();
    }

    if let Some(dictionary) = &options.dictionary {
        config.dictionary_path = Some(dictionary.clone());
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}
