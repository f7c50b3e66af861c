// crates/dualid-cli/src/main.rs
// ============================================================================
// Module: dualid CLI Entry Point
// Description: Command dispatcher for identifier, JSON, and store workflows.
// Purpose: Exercise the configured identifier stack from the command line.
// Dependencies: clap, dualid-config, dualid-core, dualid-store-sqlite,
//               serde, serde_json, thiserror, tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `dualid` CLI loads `dualid.toml` (explicit `--config`, then
//! `DUALID_CONFIG`, then `./dualid.toml`, falling back to defaults when the
//! implicit file is absent) and runs one command against it: print the
//! identifier column definition, generate identifiers, encode or decode JSON,
//! or manage records in the `SQLite` store.
//!
//! Logs go to stderr through `tracing-subscriber`; set `RUST_LOG` to raise
//! the level above the default `warn`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dualid_config::DualIdConfig;
use dualid_config::config_toml_example;
use dualid_core::Identifier;
use dualid_core::IdentifierGenerator;
use dualid_core::JsonCodec;
use dualid_core::SerdeJsonCodec;
use dualid_core::ValueTreeCodec;
use dualid_store_sqlite::RecordDraft;
use dualid_store_sqlite::SqliteRecordStore;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Log filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";
/// Upper bound for `generate --count`.
const MAX_GENERATE_COUNT: i64 = 10_000;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "dualid", version, about = "Dual-kind identifier tooling")]
struct Cli {
    /// Config file path (overrides `DUALID_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the identifier column definition.
    Column,
    /// Generate identifiers of the configured default kind.
    Generate(GenerateCommand),
    /// JSON wire-form utilities.
    Json {
        /// Selected JSON subcommand.
        #[command(subcommand)]
        command: JsonCommand,
    },
    /// Record store utilities.
    Store {
        /// Selected store subcommand.
        #[command(subcommand)]
        command: StoreCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
struct GenerateCommand {
    /// Number of identifiers to generate.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_GENERATE_COUNT))]
    count: u32,
}

/// JSON subcommands.
#[derive(Subcommand, Debug)]
enum JsonCommand {
    /// Encode an identifier as JSON.
    Encode(JsonEncodeCommand),
    /// Decode JSON into an identifier.
    Decode(JsonDecodeCommand),
}

/// Arguments for `json encode`.
#[derive(Args, Debug)]
struct JsonEncodeCommand {
    /// Identifier text; integer-looking text follows the auto-convert setting.
    value: String,
    /// Codec implementation to use.
    #[arg(long, value_enum, default_value_t = CodecArg::Serde)]
    codec: CodecArg,
}

/// Arguments for `json decode`.
#[derive(Args, Debug)]
struct JsonDecodeCommand {
    /// JSON document: null, a string, an integer, or an object with `id`.
    json: String,
    /// Codec implementation to use.
    #[arg(long, value_enum, default_value_t = CodecArg::Serde)]
    codec: CodecArg,
}

/// JSON codec selection.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum CodecArg {
    /// Streaming serde impls.
    Serde,
    /// `serde_json::Value` tree.
    ValueTree,
}

impl CodecArg {
    /// Returns the selected codec.
    fn codec(self) -> &'static dyn JsonCodec {
        match self {
            Self::Serde => &SerdeJsonCodec,
            Self::ValueTree => &ValueTreeCodec,
        }
    }
}

/// Store subcommands.
#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Insert a record, generating its id when none is given.
    Put(StorePutCommand),
    /// Print one record.
    Get {
        /// Record identifier.
        id: String,
    },
    /// Print all records.
    List,
    /// Delete one record.
    Delete {
        /// Record identifier.
        id: String,
    },
}

/// Arguments for `store put`.
#[derive(Args, Debug)]
struct StorePutCommand {
    /// Record identifier.
    #[arg(long)]
    id: Option<String>,
    /// Record label.
    #[arg(long)]
    label: String,
    /// Identifier of a related record.
    #[arg(long)]
    reference: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the config.
    Validate,
    /// Print an example config with every default spelled out.
    Example,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match run(cli, &mut stdout) {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// Executes the CLI command dispatcher.
fn run(cli: Cli, out: &mut dyn Write) -> CliResult<ExitCode> {
    if let Commands::Config {
        command: ConfigCommand::Example,
    } = cli.command
    {
        write_line(out, config_toml_example().trim_end())?;
        return Ok(ExitCode::SUCCESS);
    }
    let config = DualIdConfig::load_or_default(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    tracing::debug!(source = %config_source(&config), "config resolved");
    match cli.command {
        Commands::Column => command_column(&config, out),
        Commands::Generate(command) => command_generate(&config, &command, out),
        Commands::Json {
            command,
        } => command_json(&config, command, out),
        Commands::Store {
            command,
        } => command_store(&config, command, out),
        Commands::Config {
            command: ConfigCommand::Validate | ConfigCommand::Example,
        } => {
            write_line(out, &format!("config ok ({})", config_source(&config)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Identifier Commands
// ============================================================================

/// Prints the column definition and encoding.
fn command_column(config: &DualIdConfig, out: &mut dyn Write) -> CliResult<ExitCode> {
    let codec = config.build_codec().map_err(|err| CliError::new(err.to_string()))?;
    write_line(
        out,
        &format!(
            "{} (dialect {}, encoding {})",
            codec.column_definition(),
            config.storage.database_dialect,
            codec.encoding().as_str()
        ),
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Prints freshly generated identifiers, one per line.
fn command_generate(
    config: &DualIdConfig,
    command: &GenerateCommand,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let generator = IdentifierGenerator::new(config.identifier_config());
    for _ in 0 .. command.count {
        let id = generator.generate(None).map_err(|err| CliError::new(err.to_string()))?;
        write_line(out, &id.as_string())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Dispatches JSON subcommands.
fn command_json(
    config: &DualIdConfig,
    command: JsonCommand,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    match command {
        JsonCommand::Encode(command) => {
            let id = parse_identifier(config, &command.value)?;
            let json = command
                .codec
                .codec()
                .encode(Some(&id))
                .map_err(|err| CliError::new(err.to_string()))?;
            write_line(out, &json)?;
        }
        JsonCommand::Decode(command) => {
            let decoded = command
                .codec
                .codec()
                .decode(&command.json)
                .map_err(|err| CliError::new(err.to_string()))?;
            write_line(out, &describe(decoded.as_ref()))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Store Commands
// ============================================================================

/// Dispatches store subcommands.
fn command_store(
    config: &DualIdConfig,
    command: StoreCommand,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let codec = config.build_codec().map_err(|err| CliError::new(err.to_string()))?;
    let store = SqliteRecordStore::open(config.store_config(), codec)
        .map_err(|err| CliError::new(format!("failed to open store: {err}")))?;
    match command {
        StoreCommand::Put(command) => {
            let draft = RecordDraft {
                id: command.id.as_deref().map(|id| parse_identifier(config, id)).transpose()?,
                label: command.label,
                reference_id: command
                    .reference
                    .as_deref()
                    .map(|id| parse_identifier(config, id))
                    .transpose()?,
            };
            let record = store.insert(draft).map_err(|err| CliError::new(err.to_string()))?;
            write_json(out, &record)?;
        }
        StoreCommand::Get {
            id,
        } => {
            let id = parse_identifier(config, &id)?;
            let record = store
                .get(&id)
                .map_err(|err| CliError::new(err.to_string()))?
                .ok_or_else(|| CliError::new(format!("record {id} not found")))?;
            write_json(out, &record)?;
        }
        StoreCommand::List => {
            for record in store.list().map_err(|err| CliError::new(err.to_string()))? {
                write_json(out, &record)?;
            }
        }
        StoreCommand::Delete {
            id,
        } => {
            let id = parse_identifier(config, &id)?;
            if !store.delete(&id).map_err(|err| CliError::new(err.to_string()))? {
                return Err(CliError::new(format!("record {id} not found")));
            }
            write_line(out, &format!("deleted {id}"))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Describes where the config came from.
fn config_source(config: &DualIdConfig) -> String {
    config
        .source_path
        .as_ref()
        .map_or_else(|| "defaults".to_string(), |path| path.display().to_string())
}

/// Builds an identifier from command-line text.
///
/// With auto-convert on, integer-looking text becomes an integer. With it
/// off, the default kind decides, so `7` is an integer under an integer
/// default and text under a text default.
fn parse_identifier(config: &DualIdConfig, value: &str) -> CliResult<Identifier> {
    let identifier = &config.identifier;
    let parsed = if identifier.auto_convert_text_to_integer {
        Identifier::of_text(value, identifier)
    } else {
        Identifier::of_default_kind(value, identifier)
    };
    parsed.map_err(|err| CliError::new(format!("invalid identifier: {err}")))
}

/// Renders a decoded identifier as `<kind> <value>` or `none`.
fn describe(id: Option<&Identifier>) -> String {
    id.map_or_else(|| "none".to_string(), |id| format!("{} {id}", id.kind()))
}

/// Writes one compact JSON line.
fn write_json(out: &mut dyn Write, value: &impl serde::Serialize) -> CliResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    write_line(out, &json)
}

/// Writes a line to the command output.
fn write_line(out: &mut dyn Write, message: &str) -> CliResult<()> {
    writeln!(out, "{message}").map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
