use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sift_core::{ChainStep, FilterEngine, JobDescriptor, JobState, PipelineConfig};

#[derive(Parser)]
#[command(name = "sift", version, about = "Normalize fetched content for diffing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run content through the filter pipeline and print the result
    Run {
        /// File to read content from ("-" for stdin)
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Job attribute used for auto-matching, e.g. url=https://example.org/
        #[arg(short, long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,

        /// Explicit filter chain, e.g. "element-by-id:main,html2text,strip"
        #[arg(short, long)]
        filter: Option<String>,

        /// JSON pipeline config with a filter chain and auto-match rules
        #[arg(short, long, env = "SIFT_CONFIG")]
        config: Option<PathBuf>,

        /// Skip auto-matching and run only the explicit chain
        #[arg(long, default_value_t = false)]
        no_auto: bool,
    },

    /// List the available filters
    Filters {
        /// JSON pipeline config whose rules should be validated as well
        #[arg(short, long, env = "SIFT_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sift=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            attrs,
            filter,
            config,
            no_auto,
        } => {
            let config = load_config(config.as_deref())?;
            let steps = match filter {
                Some(spec) => ChainStep::parse_list(&spec)?,
                None => config.filter.clone(),
            };
            let engine = FilterEngine::new(sift_filters::build_registry(config.rules)?);
            let state = JobState::new(JobDescriptor::from_pairs(attrs));
            let data = read_input(&input)?;

            let output = cmd_run(&engine, &steps, &state, &data, no_auto)?;
            println!("{output}");
        }
        Commands::Filters { config } => {
            let config = load_config(config.as_deref())?;
            let registry = sift_filters::build_registry(config.rules)?;
            println!("{}", registry.documentation());
            if registry.anonymous_count() > 0 {
                println!("\n{} auto-match rule(s) loaded", registry.anonymous_count());
            }
        }
    }

    Ok(())
}

fn cmd_run(
    engine: &FilterEngine,
    steps: &[ChainStep],
    state: &JobState,
    data: &str,
    no_auto: bool,
) -> Result<String> {
    tracing::info!(
        "Filtering {} bytes from {} ({} explicit step(s))",
        data.len(),
        state.job.location(),
        steps.len()
    );

    let output = if no_auto {
        if steps.is_empty() {
            bail!("--no-auto needs an explicit filter chain");
        }
        engine.apply_steps(steps, state, data)?
    } else {
        engine.run(steps, state, data)?
    };

    tracing::info!("Filtered down to {} bytes", output.len());
    Ok(output)
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("Failed to load pipeline config {}", path.display())),
        None => Ok(PipelineConfig::default()),
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut data = String::new();
        std::io::stdin()
            .read_to_string(&mut data)
            .context("Failed to read content from stdin")?;
        return Ok(data);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read input file: {input}"))
}

/// Parse `key=value` into a job attribute pair.
fn parse_attr(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))?;
    if key.trim().is_empty() {
        return Err(format!("empty attribute name in {raw:?}"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attr() {
        assert_eq!(
            parse_attr("url=https://example.org/?a=b").unwrap(),
            ("url".to_string(), "https://example.org/?a=b".to_string())
        );
        assert!(parse_attr("novalue").is_err());
        assert!(parse_attr("=x").is_err());
    }

    #[test]
    fn test_cmd_run_auto_then_explicit() {
        let config = PipelineConfig::from_json(
            r#"{"rules": [{"match": {"url": "https://example.org/"}, "filter": "element-by-tag:b"}]}"#,
        )
        .unwrap();
        let engine = FilterEngine::new(sift_filters::build_registry(config.rules).unwrap());
        let state = JobState::new(JobDescriptor::for_url("https://example.org/"));
        let steps = ChainStep::parse_list("html2text").unwrap();

        let out = cmd_run(&engine, &steps, &state, "<p>x <b>bold</b></p>", false).unwrap();
        assert_eq!(out, "bold");

        let out = cmd_run(&engine, &steps, &state, "<p>x <b>bold</b></p>", true).unwrap();
        assert_eq!(out, "x bold");

        assert!(cmd_run(&engine, &[], &state, "x", true).is_err());
    }

    #[test]
    fn test_load_config_defaults_to_auto_mode() {
        let config = load_config(None).unwrap();
        assert!(config.filter.is_empty());
        assert!(config.rules.is_empty());
    }
}
