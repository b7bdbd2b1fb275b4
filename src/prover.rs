//! Minimal CLI prover
//!
//! Usage:
//!   prover setup  --coefficients <N> [--g2-powers <K>] [-o srs.bin]
//!   prover commit --srs srs.bin (--coeffs 3,2,1 | --values 1,2,3,4)
//!                 [--points 2,5] [--proof] [--out-dir .]
//!
//! `setup` writes a fresh SRS for polynomials with `N` coefficients.
//! `commit` writes `commitment.bin`, one `witness_<k>.bin` per point and,
//! with `--proof`, `proof.bin`; evaluations are printed to stdout.
//!
//! Scalars are decimal integers reduced into the BN254 scalar field.
//! Set `RUST_LOG=debug` for tracing output.

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use polycommit::{
    api::{self, CommitInput},
    params::write_fresh_srs,
    DefaultCurve, F,
};

#[derive(Parser)]
#[command(name = "prover")]
#[command(about = "Polynomial commitment prover", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh SRS
    Setup {
        /// Number of coefficients supported (degree + 1)
        #[arg(long)]
        coefficients: usize,

        /// Powers of alpha published in group B
        #[arg(long, default_value = "1")]
        g2_powers: usize,

        /// Output file
        #[arg(long, short = 'o', default_value = "srs.bin")]
        output: PathBuf,
    },

    /// Commit to a polynomial and open it
    Commit {
        /// SRS file
        #[arg(long)]
        srs: PathBuf,

        /// Coefficients, low to high, comma separated
        #[arg(long, conflicts_with = "values")]
        coeffs: Option<String>,

        /// Values at 0, 1, 2, …, comma separated
        #[arg(long)]
        values: Option<String>,

        /// Evaluation points, comma separated
        #[arg(long, default_value = "")]
        points: String,

        /// Attach a proof of knowledge
        #[arg(long)]
        proof: bool,

        /// Output directory
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn parse_scalars(s: &str) -> anyhow::Result<Vec<F>> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .map(|tok| F::from_str(tok).map_err(|_| anyhow!("not a scalar: `{}`", tok)))
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Setup {
            coefficients,
            g2_powers,
            output,
        } => {
            let t = coefficients
                .checked_sub(1)
                .ok_or_else(|| anyhow!("--coefficients must be at least 1"))?;
            let mut out = Vec::new();
            write_fresh_srs::<DefaultCurve, _, _>(&mut out, t, g2_powers, &mut rand::thread_rng())?;
            fs::write(&output, &out).with_context(|| format!("writing {}", output.display()))?;
            println!("✓ SRS for degree {} written to {}", t, output.display());
        }

        Commands::Commit {
            srs,
            coeffs,
            values,
            points,
            proof,
            out_dir,
        } => {
            let bytes = fs::read(&srs).with_context(|| format!("reading {}", srs.display()))?;
            let params = api::load::<DefaultCurve>(&bytes)?;

            let scalars = match (&coeffs, &values) {
                (Some(c), None) => parse_scalars(c)?,
                (None, Some(v)) => parse_scalars(v)?,
                _ => bail!("exactly one of --coeffs or --values is required"),
            };
            let input = if coeffs.is_some() {
                CommitInput::Coefficients(scalars.as_slice())
            } else {
                CommitInput::Values(scalars.as_slice())
            };
            let points = parse_scalars(&points)?;

            let out = api::commit(&params, input, &points, proof)?;

            fs::create_dir_all(&out_dir)?;
            fs::write(out_dir.join("commitment.bin"), out.commitment.to_bytes(true))?;
            for (k, (i, (fi, w))) in points.iter().zip(&out.openings).enumerate() {
                fs::write(out_dir.join(format!("witness_{}.bin", k)), w.to_bytes(true))?;
                println!("f({}) = {}", i, fi);
            }
            if let Some(p) = &out.proof {
                fs::write(out_dir.join("proof.bin"), p)?;
            }
            println!("✓ Commitment written to {}", out_dir.display());
        }
    }

    Ok(())
}
