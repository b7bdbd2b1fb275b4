//! Minimal CLI verifier
//!
//! Usage:
//!   verifier eval  --srs srs.bin --commitment commitment.bin
//!                  --point 2 --value 11 --witness witness_0.bin
//!   verifier proof --srs srs.bin --commitment commitment.bin --proof proof.bin
//!
//! Exits non-zero when the check fails.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use polycommit::{api, group::SourceA, CommitmentParams, DefaultCurve, F, G1};

#[derive(Parser)]
#[command(name = "verifier")]
#[command(about = "Polynomial commitment verifier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an evaluation witness
    Eval {
        /// SRS file
        #[arg(long)]
        srs: PathBuf,

        /// Commitment file
        #[arg(long)]
        commitment: PathBuf,

        /// Evaluation point
        #[arg(long)]
        point: String,

        /// Claimed value at the point
        #[arg(long)]
        value: String,

        /// Witness file
        #[arg(long)]
        witness: PathBuf,
    },

    /// Check a proof of knowledge
    Proof {
        /// SRS file
        #[arg(long)]
        srs: PathBuf,

        /// Commitment file
        #[arg(long)]
        commitment: PathBuf,

        /// Proof file
        #[arg(long)]
        proof: PathBuf,
    },
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn scalar(s: &str) -> anyhow::Result<F> {
    F::from_str(s.trim()).map_err(|_| anyhow!("not a scalar: `{}`", s))
}

fn load_element(params: &CommitmentParams<DefaultCurve>, path: &Path) -> anyhow::Result<G1<DefaultCurve>> {
    Ok(params.context().decode::<SourceA>(&read(path)?, true)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Eval {
            srs,
            commitment,
            point,
            value,
            witness,
        } => {
            let params = api::load::<DefaultCurve>(&read(&srs)?)?;
            let c = load_element(&params, &commitment)?;
            let w = load_element(&params, &witness)?;
            let (i, fi) = (scalar(&point)?, scalar(&value)?);
            if !api::verify_eval(&params, &c, &i, &fi, &w) {
                bail!("evaluation f({}) = {} rejected", i, fi);
            }
            println!("✓ f({}) = {} verified", i, fi);
        }

        Commands::Proof {
            srs,
            commitment,
            proof,
        } => {
            let params = api::load::<DefaultCurve>(&read(&srs)?)?;
            let c = load_element(&params, &commitment)?;
            if !api::verify_proof(&params, &c, &read(&proof)?) {
                bail!("proof of knowledge rejected");
            }
            println!("✓ proof of knowledge verified");
        }
    }

    Ok(())
}
