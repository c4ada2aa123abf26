use anyhow::{bail, Context, Result};
use autorm::{ModelConfig, Registry};
use clap::Subcommand;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a model document and print its mapping as JSON
    Map {
        /// Path to the model document
        path: PathBuf,

        /// Only print the mapping of this entity
        #[arg(short, long)]
        entity: Option<String>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Compile model documents and report whether they map cleanly
    Check {
        /// Paths to model documents
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the filter definitions of a model document as JSON
    Filters {
        /// Path to the model document
        path: PathBuf,
    },
}

impl Command {
    pub fn run(self, registry: &Registry, out: &mut dyn Write) -> Result<()> {
        match self {
            Command::Map {
                path,
                entity,
                compact,
            } => {
                let compiled = compile(&path, registry)?;

                match entity {
                    Some(name) => {
                        let Some(entity) = compiled.entity(&name) else {
                            bail!("model `{}` has no entity `{name}`", compiled.name);
                        };
                        print_json(out, entity, compact)
                    }
                    None => print_json(out, &compiled, compact),
                }
            }
            Command::Check { paths } => {
                let mut failed = 0;

                for path in &paths {
                    match compile(path, registry) {
                        Ok(compiled) => writeln!(
                            out,
                            "ok    {} ({} entities)",
                            path.display(),
                            compiled.entities.len()
                        )?,
                        Err(err) => {
                            failed += 1;
                            writeln!(out, "error {}: {err:#}", path.display())?;
                        }
                    }
                }

                if failed > 0 {
                    bail!("{failed} of {} model documents failed to compile", paths.len());
                }
                Ok(())
            }
            Command::Filters { path } => {
                let compiled = compile(&path, registry)?;
                print_json(out, &compiled.filter_definitions, false)
            }
        }
    }
}

fn compile(path: &Path, registry: &Registry) -> Result<autorm::CompiledModel> {
    let config = ModelConfig::from_path(path)?;

    let mut registry = registry.clone();
    config.register(&mut registry);

    let compiled = config
        .compile_with(&registry)
        .with_context(|| format!("failed to compile `{}`", path.display()))?;

    tracing::info!(
        model = %compiled.name,
        entities = compiled.entities.len(),
        "compiled model document"
    );
    Ok(compiled)
}

fn print_json(out: &mut dyn Write, value: &impl Serialize, compact: bool) -> Result<()> {
    if compact {
        serde_json::to_writer(&mut *out, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
