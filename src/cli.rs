//! Minimal CLI: descriptor files in → (rust | params) out.
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::driver::{self, Artifact, ParamsReport};
use crate::error::GenError;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate bounded-storage protobuf codecs from JSON schema descriptors
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one Rust artifact per descriptor file
    Rust(RustOut),
    /// report the capacity parameters each message declares
    Params(ParamsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct RustOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory for .rs artifacts (stdout if omitted)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ParamsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn resolve(&self) -> anyhow::Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Rust(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let paths = target.input_settings.resolve()?;
                if target.out_dir.is_none() && paths.len() > 1 {
                    bail!("--out-dir is required when more than one input is given");
                }
                let results: Vec<(&PathBuf, Result<Artifact, GenError>)> = paths
                    .par_iter()
                    .map(|path| (path, driver::generate_file(path)))
                    .collect();

                let mut failed = false;
                for (path, result) in results {
                    match result {
                        Ok(artifact) => {
                            if let Some(out_dir) = target.out_dir.as_ref() {
                                std::fs::create_dir_all(out_dir)?;
                                let dest = out_dir.join(&artifact.file_name);
                                std::fs::write(&dest, &artifact.source)
                                    .with_context(|| format!("writing {}", dest.display()))?;
                                eprintln!(
                                    "{} {} -> {}",
                                    "generated".green(),
                                    path.display(),
                                    dest.display()
                                );
                            } else {
                                println!("{}", artifact.source);
                            }
                        }
                        Err(error) => {
                            failed = true;
                            eprintln!("{} {}: {error}", "failed".red().bold(), path.display());
                        }
                    }
                }
                if failed {
                    bail!("one or more descriptor files failed");
                }
                Ok(())
            }
            Command::Params(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let paths = target.input_settings.resolve()?;
                let results: Vec<(&PathBuf, Result<ParamsReport, GenError>)> = paths
                    .par_iter()
                    .map(|path| (path, driver::params_report(path)))
                    .collect();

                let mut failed = false;
                let mut reports = Vec::new();
                for (path, result) in results {
                    match result {
                        Ok(report) => reports.push(report),
                        Err(error) => {
                            failed = true;
                            eprintln!("{} {}: {error}", "failed".red().bold(), path.display());
                        }
                    }
                }
                if failed {
                    bail!("one or more descriptor files failed");
                }

                let report_src = serde_json::to_string_pretty(&reports)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(out, &report_src)
                        .with_context(|| format!("writing {}", out.display()))?;
                } else {
                    println!("{report_src}");
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
