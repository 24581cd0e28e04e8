// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fl_error::DomainRegistry;
use schemars::schema_for;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Repo maintenance tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the JSON Schema for the faultline config file.
    Schema {
        /// Output directory.
        #[arg(long, default_value = "contracts/schemas")]
        out_dir: PathBuf,
    },
    /// Print the reference table of registered domains and codes.
    Codes {
        /// Only list this domain.
        #[arg(long)]
        domain: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Schema { out_dir } => schema(&out_dir),
        Command::Codes { domain } => codes(domain.as_deref()),
    }
}

fn schema(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir).context("create schema output dir")?;

    let config = schema_for!(fl_config::FaultlineConfig);
    write_schema(&out_dir.join("faultline_config.schema.json"), &config)?;

    eprintln!("wrote schemas to {}", out_dir.display());
    Ok(())
}

fn write_schema(path: &Path, schema: &schemars::Schema) -> Result<()> {
    let s = serde_json::to_string_pretty(schema)?;
    std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn codes(only: Option<&str>) -> Result<()> {
    let registry = DomainRegistry::global();
    fl_codes::register_all(registry);

    let domains: Vec<String> = match only {
        Some(name) if registry.contains(name) => vec![name.to_string()],
        Some(name) => anyhow::bail!("unknown domain '{name}'"),
        None => registry.domains(),
    };

    println!("| Domain | Code | Name |");
    println!("|---|---:|---|");
    for name in &domains {
        let domain = registry.intern(name);
        for code in registry.codes(&domain) {
            let label = registry.code_name(&domain, code).unwrap_or("");
            println!("| {name} | {code} | {label} |");
        }
    }
    Ok(())
}
