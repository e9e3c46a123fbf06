//! Command-line interface for `sboxlab`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use sbox_core::{Error, SBox, AES_SBOX};
use sboxlab_analysis::{Analyzer, Report};
use sboxlab_trace::{block_from_slice, Block, Step, StepMachine};

/// S-box quality metrics and a step-traceable AES-128.
#[derive(Parser)]
#[command(
    name = "sboxlab",
    version,
    author,
    about = "Analyze 8-bit S-boxes and trace AES-128 rounds with custom substitution layers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an S-box and print its metric report.
    Analyze {
        /// Path to a 256-entry S-box grid (decimal or 0x-prefixed hex).
        #[arg(long, value_name = "FILE", conflicts_with = "aes")]
        sbox: Option<PathBuf>,
        /// Use the standard AES S-box.
        #[arg(long, default_value_t = false)]
        aes: bool,
        /// Emit the report as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Encrypt one 16-byte block.
    Encrypt {
        /// Plaintext as 32 hex characters, whitespace between pairs allowed.
        #[arg(long, value_name = "HEX")]
        plaintext: String,
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key: String,
        /// Path to the S-box grid to substitute with.
        #[arg(long, value_name = "FILE", conflicts_with = "aes")]
        sbox: Option<PathBuf>,
        /// Use the standard AES S-box.
        #[arg(long, default_value_t = false)]
        aes: bool,
        /// Print every round operation instead of just the ciphertext.
        #[arg(long, default_value_t = false)]
        trace: bool,
        /// Emit JSON instead of formatted text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Decrypt one 16-byte block.
    Decrypt {
        /// Ciphertext as 32 hex characters, whitespace between pairs allowed.
        #[arg(long, value_name = "HEX")]
        ciphertext: String,
        /// AES-128 key as 32 hex characters.
        #[arg(long, value_name = "HEX")]
        key: String,
        /// Path to the S-box grid to substitute with.
        #[arg(long, value_name = "FILE", conflicts_with = "aes")]
        sbox: Option<PathBuf>,
        /// Use the standard AES S-box.
        #[arg(long, default_value_t = false)]
        aes: bool,
        /// Print every round operation instead of just the plaintext.
        #[arg(long, default_value_t = false)]
        trace: bool,
        /// Emit JSON instead of formatted text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write a sample S-box grid for experimentation.
    Sample {
        /// Output path for the 16×16 grid.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Write a random permutation instead of the standard AES S-box.
        #[arg(long, default_value_t = false)]
        random: bool,
        /// Optional RNG seed for reproducible permutations.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { sbox, aes, json } => cmd_analyze(sbox.as_deref(), aes, json),
        Commands::Encrypt {
            plaintext,
            key,
            sbox,
            aes,
            trace,
            json,
        } => cmd_crypt(&plaintext, "plaintext", &key, sbox.as_deref(), aes, trace, json, true),
        Commands::Decrypt {
            ciphertext,
            key,
            sbox,
            aes,
            trace,
            json,
        } => cmd_crypt(
            &ciphertext,
            "ciphertext",
            &key,
            sbox.as_deref(),
            aes,
            trace,
            json,
            false,
        ),
        Commands::Sample { out, random, seed } => cmd_sample(&out, random, seed),
    }
}

fn cmd_analyze(sbox_path: Option<&std::path::Path>, aes: bool, json: bool) -> Result<()> {
    let sbox = load_sbox(sbox_path, aes)?;
    let report = Analyzer::new(sbox).report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_crypt(
    block_hex: &str,
    block_field: &'static str,
    key_hex: &str,
    sbox_path: Option<&std::path::Path>,
    aes: bool,
    trace: bool,
    json: bool,
    encrypt: bool,
) -> Result<()> {
    let block = parse_block_hex(block_hex, block_field)?;
    let key = parse_block_hex(key_hex, "key")?;
    let sbox = load_sbox(sbox_path, aes)?;

    let mut machine = if encrypt {
        StepMachine::encrypt(&block, &key, sbox)
    } else {
        StepMachine::decrypt(&block, &key, sbox)
    };
    let output = machine.run_to_end();

    if trace {
        if json {
            println!("{}", serde_json::to_string_pretty(machine.history())?);
        } else {
            for step in machine.history() {
                print_step(step);
            }
        }
    } else if json {
        println!("{}", serde_json::json!({ "output": hex::encode(output) }));
    } else {
        println!("{}", hex::encode(output));
    }
    Ok(())
}

fn cmd_sample(out: &std::path::Path, random: bool, seed: Option<u64>) -> Result<()> {
    let table = if random {
        let mut table: Vec<u8> = (0..=255).collect();
        table.shuffle(&mut seeded_rng(seed));
        table
    } else {
        AES_SBOX.to_vec()
    };

    let mut grid = String::new();
    for row in table.chunks(16) {
        let line: Vec<String> = row.iter().map(|b| format!("{b:#04x}")).collect();
        grid.push_str(&line.join(" "));
        grid.push('\n');
    }
    fs::write(out, grid).with_context(|| format!("write {}", out.display()))?;
    Ok(())
}

fn load_sbox(path: Option<&std::path::Path>, aes: bool) -> Result<SBox> {
    match path {
        Some(path) if !aes => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            parse_sbox_text(&text)
        }
        _ => Ok(SBox::from_array(AES_SBOX).expect("the standard S-box is a permutation")),
    }
}

/// Parses a 256-entry grid of decimal or `0x`-prefixed hex values,
/// separated by whitespace or commas and arriving row-major.
fn parse_sbox_text(text: &str) -> Result<SBox> {
    let mut values = Vec::with_capacity(256);
    for token in text.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        let value = match token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            Some(digits) => u32::from_str_radix(digits, 16),
            None => token.parse(),
        }
        .with_context(|| format!("parse s-box entry {token:?}"))?;
        values.push(value);
    }
    Ok(SBox::from_values(&values)?)
}

/// Parses a 16-byte hex field, tolerating whitespace between pairs.
fn parse_block_hex(field_hex: &str, field: &'static str) -> Result<Block> {
    let compact: String = field_hex.split_whitespace().collect();
    let bytes = hex::decode(&compact).map_err(|_| Error::HexParse { field })?;
    Ok(block_from_slice(&bytes)?)
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    let mut seed_bytes = [0u8; 32];
    match seed {
        Some(value) => seed_bytes[..8].copy_from_slice(&value.to_le_bytes()),
        None => rand::rngs::OsRng.fill_bytes(&mut seed_bytes),
    }
    ChaCha20Rng::from_seed(seed_bytes)
}

fn print_report(report: &Report) {
    println!("nonlinearity:            {}", report.nonlinearity);
    println!(
        "differential uniformity: {} (DAP {:.6})",
        report.differential.uniformity, report.differential.probability
    );
    println!(
        "linear approximation:    max bias {} (LAP {:.6})",
        report.linear.max_bias, report.linear.probability
    );
    println!(
        "SAC:                     score {:.6}, max deviation {:.6}",
        report.sac.score, report.sac.max_deviation
    );
    println!(
        "BIC-NL:                  min {}, mean {:.2}",
        report.bic_nl.min, report.bic_nl.mean
    );
    println!(
        "BIC-SAC:                 max {:.6}, mean {:.6}",
        report.bic_sac.max, report.bic_sac.mean
    );
    println!("algebraic degree:        {}", report.algebraic_degree);
    println!("transparency order:      {:.6}", report.transparency_order);
    println!("correlation immunity:    {}", report.correlation_immunity);
    println!(
        "balanced / bijective:    {} / {}",
        report.balanced, report.bijective
    );
    println!("security level:          {:?}", report.summary.level);
    for strength in &report.summary.strengths {
        println!("  + {strength}");
    }
    for weakness in &report.summary.weaknesses {
        println!("  - {weakness}");
    }
}

fn print_step(step: &Step) {
    println!(
        "round {:>2}  {:<13} {:>3}%",
        step.round,
        format!("{:?}", step.op),
        step.progress
    );
    for row in step.matrix() {
        let cells: Vec<String> = row.iter().map(|b| format!("{b:02x}")).collect();
        println!("    {}", cells.join(" "));
    }
}
