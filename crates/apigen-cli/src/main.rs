mod output;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;

use apigen_core::config::{self, ApigenConfig, CONFIG_FILE_NAME};
use apigen_core::ir::SpecMetadata;
use apigen_core::parse::{self, Format, spec::OpenApiSpec};
use apigen_core::{CodeGenerator, transform};
use apigen_rust::{RustGenerator, RustGeneratorConfig};

use crate::output::TargetOutput;

#[derive(Parser)]
#[command(name = "apigen", about = "OpenAPI 3.x to Rust code generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every configured target
    Generate {
        /// Path to the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the resolved spec metadata of an OpenAPI spec
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new apigen configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config } => cmd_generate(&config),

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "apigen", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn read_spec(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    parse::parse(&content, Format::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn load_spec(path: &Path) -> Result<SpecMetadata> {
    let parsed = read_spec(path)?;
    let spec = transform::transform(&parsed)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Ok(spec)
}

fn load_project(config_path: &Path) -> Result<ApigenConfig> {
    let cfg = config::load_config(config_path)
        .map_err(|e| anyhow::anyhow!(e))?
        .with_context(|| {
            format!(
                "{} not found; run `apigen init` to create one",
                config_path.display()
            )
        })?;
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", config_path.display()))?;
    Ok(cfg)
}

/// Render every target in memory. Nothing is written unless all succeed.
fn render_targets(cfg: &ApigenConfig, base: &Path) -> Result<Vec<TargetOutput>> {
    let spec_dir = base.join(&cfg.spec_dir);
    let output_dir = base.join(&cfg.output);

    let mut outputs = Vec::with_capacity(cfg.targets.len());
    for target in &cfg.targets {
        let spec_path = spec_dir.join(&target.spec);
        info!("generating {} from {}", target.namespace, spec_path.display());

        let spec = load_spec(&spec_path)?;
        let files = RustGenerator
            .generate(
                &spec,
                &RustGeneratorConfig {
                    server: target.server,
                },
            )
            .with_context(|| format!("failed to generate {}", target.namespace))?;

        outputs.push(TargetOutput {
            dir: target.output_dir(&output_dir),
            files,
        });
    }
    Ok(outputs)
}

fn cmd_generate(config_path: &Path) -> Result<()> {
    let cfg = load_project(config_path)?;
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let outputs = render_targets(&cfg, base)?;
    output::apply(&outputs)?;

    for target in &outputs {
        eprintln!(
            "Generated {} files in {}",
            target.files.len(),
            target.dir.display()
        );
    }
    eprintln!("\nThe generated modules should not be edited manually; changes will be overwritten.");
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let parsed = read_spec(input)?;

    eprintln!(
        "Valid OpenAPI {} spec: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());

    eprintln!("  Schemas: {}", parsed.schema_count());

    let spec = transform::transform(&parsed)?;
    eprintln!("  Operations: {}", spec.operations.len());
    eprintln!("  Registered types: {}", spec.refs.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let spec = load_spec(input)?;

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&spec)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&spec)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
