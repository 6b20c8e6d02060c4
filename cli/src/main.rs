use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optionapi_codegen::{Generator, GeneratorConfig, RustGenerator};
use optionapi_core::{Document, NamedCommands, SchemaError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Output format for `inspect`.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum InspectFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "optionapi-gen")]
#[command(about = "Generate Rust command bindings from optionapi CLI specifications")]
#[command(version)]
struct Cli {
    /// Log pipeline stages to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse, validate and resolve a specification.
    Validate(ValidateArgs),
    /// Generate Rust bindings for a specification.
    Generate(GenerateArgs),
    /// Print the resolved specification.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Specification file, or `-` for stdin.
    input: PathBuf,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Specification file, or `-` for stdin.
    input: PathBuf,
    /// Output file (default: stdout).
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Generator config YAML; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Name of the generated module.
    #[arg(long)]
    module_name: Option<String>,
    /// Name of the generated trait.
    #[arg(long)]
    trait_name: Option<String>,
    /// Name of the generated default implementation.
    #[arg(long)]
    struct_name: Option<String>,
    /// Identifier of the global option record.
    #[arg(long)]
    global_options_name: Option<String>,
    /// Crate path providing `Context` and `CommandError`.
    #[arg(long)]
    runtime_crate: Option<String>,
    /// Also emit a static command table.
    #[arg(long)]
    command_table: bool,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Specification file, or `-` for stdin.
    input: PathBuf,
    /// Output format.
    #[arg(long, default_value = "yaml")]
    format: InspectFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Generate(args) => run_generate(args),
        Command::Inspect(args) => run_inspect(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let document = load_document(&args.input)?;
    println!(
        "Validated '{}': {} command(s), {} global option(s), {} component(s).",
        args.input.display(),
        count_commands(&document),
        document.options.len(),
        document.components.options.len()
    );
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let config = generator_config(&args)?;
    let document = load_document(&args.input)?;
    let generator = RustGenerator::new(config);

    let written = match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            let file = fs::File::create(path)
                .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
            let mut out = BufWriter::new(file);
            let written = generator
                .generate(&document, &mut out)
                .map_err(|err| err.to_string())?;
            out.flush()
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!("Wrote {written} bytes to '{}'.", path.display());
            written
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let written = generator
                .generate(&document, &mut out)
                .map_err(|err| err.to_string())?;
            out.flush()
                .map_err(|err| format!("Failed to write to stdout: {err}"))?;
            written
        }
    };

    info!(bytes = written, "Generation finished");
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let document = load_document(&args.input)?;
    let rendered = match args.format {
        InspectFormat::Json => serde_json::to_string_pretty(&document)
            .map_err(|err| format!("Failed to serialize document: {err}"))?,
        InspectFormat::Yaml => serde_yaml::to_string(&document)
            .map_err(|err| format!("Failed to serialize document: {err}"))?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn generator_config(args: &GenerateArgs) -> Result<GeneratorConfig, String> {
    let base = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    let overrides = GeneratorConfig {
        module_name: args.module_name.clone(),
        trait_name: args.trait_name.clone(),
        struct_name: args.struct_name.clone(),
        global_options_name: args.global_options_name.clone(),
        runtime_crate: args.runtime_crate.clone(),
        command_table: args.command_table,
    };
    let config = base.merged_with(overrides);
    debug!(?config, "Generator config");
    Ok(config)
}

fn load_document(input: &Path) -> Result<Document, String> {
    let result = if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|err| format!("Failed to read stdin: {err}"))?;
        optionapi_core::parse_str(&text)
    } else {
        let file = fs::File::open(input)
            .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?;
        optionapi_core::parse(file)
    };
    result.map_err(|err| describe(&err))
}

/// Renders a parse failure, listing every validation message.
fn describe(err: &SchemaError) -> String {
    let mut message = err.to_string();
    for field_error in err.field_errors() {
        message.push_str(&format!("\n  {field_error}"));
    }
    message
}

fn count_commands(document: &Document) -> usize {
    count_nested(&document.commands)
}

fn count_nested(commands: &NamedCommands) -> usize {
    commands
        .iter()
        .map(|(_, command)| 1 + count_nested(&command.commands))
        .sum()
}
