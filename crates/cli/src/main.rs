//! doc2openapi CLI
//!
//! Command-line interface for compiling markdown API documentation into
//! an OpenAPI 3.0 specification.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use doc2openapi_common::{Entity, GeneratorConfig, Method, OverrideTables};
use doc2openapi_generator::{validator, OpenApiGenerator};
use doc2openapi_parser::{EntityParser, MethodParser};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "doc2openapi")]
#[command(version, about = "Compile markdown API documentation into an OpenAPI specification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an OpenAPI document from documentation directories
    #[command(after_help = "EXAMPLES:\n  \
        # Generate from a Mastodon documentation checkout\n  \
        doc2openapi generate \\\n    \
        --entities ./content/en/entities \\\n    \
        --methods ./content/en/methods \\\n    \
        --output ./openapi.yaml\n\n  \
        # Emit both YAML and JSON\n  \
        doc2openapi generate \\\n    \
        --entities ./entities --methods ./methods \\\n    \
        --output ./openapi.yaml --format both")]
    Generate {
        /// Directory of entity documentation files
        #[arg(short, long)]
        entities: PathBuf,

        /// Directory of method documentation files
        #[arg(short, long)]
        methods: PathBuf,

        /// Optional generator configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path
        #[arg(short, long, default_value = "./openapi.yaml")]
        output: PathBuf,

        /// Output serialization format
        #[arg(short, long, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Parse documentation and display the extracted semantic model
    Parse {
        /// Directory of entity documentation files
        #[arg(short, long)]
        entities: Option<PathBuf>,

        /// Directory of method documentation files
        #[arg(short, long)]
        methods: Option<PathBuf>,

        /// Optional generator configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate an existing OpenAPI document
    Validate {
        /// Path to the OpenAPI document (YAML or JSON)
        spec: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
    Both,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            entities,
            methods,
            config,
            output,
            format,
        } => generate_command(
            entities.as_path(),
            methods.as_path(),
            config.as_deref(),
            output.as_path(),
            format,
            cli.verbose,
        ),
        Commands::Parse {
            entities,
            methods,
            config,
        } => parse_command(entities.as_deref(), methods.as_deref(), config.as_deref(), cli.verbose),
        Commands::Validate { spec } => validate_command(spec.as_path()),
    }
}

fn generate_command(
    entities_dir: &Path,
    methods_dir: &Path,
    config_path: Option<&Path>,
    output: &Path,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let config = GeneratorConfig::load_or_default(config_path)
        .context("Failed to load generator configuration")?;

    let (entities, methods) = parse_documentation(
        Some(entities_dir),
        Some(methods_dir),
        &config,
        verbose,
    )?;
    println!(
        "{} Parsed {} entities and {} methods",
        "✓".green(),
        entities.len(),
        methods.len()
    );

    println!("{} Synthesizing OpenAPI document...", "→".cyan());
    let mut generator = OpenApiGenerator::new(config);
    let document = generator
        .generate(&entities, &methods)
        .context("Failed to generate OpenAPI document")?;
    for warning in generator.warnings() {
        println!("{} {}", "⚠".yellow(), warning.yellow());
    }

    let stats = validator::stats(&serde_json::to_value(&document)?);

    match format {
        OutputFormat::Yaml => {
            doc2openapi_generator::write_yaml(&document, output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} Wrote {}", "✓".green(), output.display());
        }
        OutputFormat::Json => {
            doc2openapi_generator::write_json(&document, output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("{} Wrote {}", "✓".green(), output.display());
        }
        OutputFormat::Both => {
            let yaml_path = output.with_extension("yaml");
            let json_path = output.with_extension("json");
            doc2openapi_generator::write_yaml(&document, &yaml_path)
                .with_context(|| format!("Failed to write {}", yaml_path.display()))?;
            doc2openapi_generator::write_json(&document, &json_path)
                .with_context(|| format!("Failed to write {}", json_path.display()))?;
            println!("{} Wrote {}", "✓".green(), yaml_path.display());
            println!("{} Wrote {}", "✓".green(), json_path.display());
        }
    }

    println!("\n{}", "✓ Generation successful!".green().bold());
    println!("  Paths: {}", stats.paths.to_string().yellow());
    println!("  Operations: {}", stats.operations.to_string().yellow());
    println!("  Schemas: {}", stats.schemas.to_string().yellow());
    println!("  Tags: {}", stats.tags.to_string().yellow());

    Ok(())
}

fn parse_command(
    entities_dir: Option<&Path>,
    methods_dir: Option<&Path>,
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let config = GeneratorConfig::load_or_default(config_path)
        .context("Failed to load generator configuration")?;

    let (entities, methods) = parse_documentation(entities_dir, methods_dir, &config, verbose)?;

    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("  Entities: {}", entities.len().to_string().yellow());
    println!("  Methods: {}", methods.len().to_string().yellow());

    if verbose {
        println!("\n{}", "Entities:".bold());
        for entity in &entities {
            println!("  • {} ({} attributes)", entity.name.cyan(), entity.attributes.len());
        }
        println!("\n{}", "Methods:".bold());
        for method in &methods {
            println!(
                "  • {} {} ({})",
                method.http_method.as_str().cyan(),
                method.endpoint,
                method.name
            );
        }
    }

    Ok(())
}

fn validate_command(spec_path: &Path) -> Result<()> {
    println!("{} Validating {}", "→".cyan(), spec_path.display());

    let content = std::fs::read_to_string(spec_path)
        .with_context(|| format!("Failed to read {}", spec_path.display()))?;
    let document: serde_json::Value = if spec_path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content).context("Failed to parse JSON document")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse YAML document")?
    };

    let errors = validator::validate(&document);
    if !errors.is_empty() {
        println!("\n{}", "✗ Validation failed:".red().bold());
        for (path, message) in &errors {
            println!("  {} {}", path.red(), message);
        }
        anyhow::bail!("{} validation error(s)", errors.len());
    }

    let stats = validator::stats(&document);
    println!("\n{}", "✓ Document is valid!".green().bold());
    println!("  Paths: {}", stats.paths.to_string().yellow());
    println!("  Operations: {}", stats.operations.to_string().yellow());
    println!("  Schemas: {}", stats.schemas.to_string().yellow());
    println!("  Tags: {}", stats.tags.to_string().yellow());

    Ok(())
}

/// Parse both documentation trees into the semantic model.
///
/// Files are visited in lexicographic order so the synthesis stage
/// produces stable shared-component names across runs.
fn parse_documentation(
    entities_dir: Option<&Path>,
    methods_dir: Option<&Path>,
    config: &GeneratorConfig,
    verbose: bool,
) -> Result<(Vec<Entity>, Vec<Method>)> {
    let overrides = OverrideTables::load_or_default(config.overrides_file.as_deref())
        .context("Failed to load override tables")?;

    let mut entities = Vec::new();
    if let Some(dir) = entities_dir {
        println!("{} Parsing entity files: {}", "→".cyan(), dir.display());
        let parser = EntityParser::new(&config.baseline_version, overrides);
        for file in markdown_files(dir)? {
            let parsed = parser
                .parse_file(&file)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            if verbose {
                println!("  {} ({} entities)", file.display(), parsed.len());
            }
            entities.extend(parsed);
        }
    }

    let mut methods = Vec::new();
    if let Some(dir) = methods_dir {
        println!("{} Parsing method files: {}", "→".cyan(), dir.display());
        let known: HashSet<String> = entities.iter().map(|e| e.name.clone()).collect();
        let parser = MethodParser::new(known);
        for file in markdown_files(dir)? {
            let parsed = parser
                .parse_file(&file)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            if verbose {
                println!("  {} ({} methods)", file.display(), parsed.methods.len());
            }
            methods.extend(parsed.methods);
            entities.extend(parsed.inline_entities);
        }
    }

    Ok((entities, methods))
}

/// Markdown files under a directory, in lexicographic order
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|e| e == "md"))
        .collect();
    files.sort();
    Ok(files)
}
