//! Oncostat binary: run the study pipeline over two input files and
//! print the JSON report for the external reporting layer.

use anyhow::{bail, Context, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(metadata_path), Some(results_path)) = (args.next(), args.next()) else {
        bail!("usage: oncostat <mouse_metadata.csv> <study_results.csv>");
    };
    if args.next().is_some() {
        bail!("usage: oncostat <mouse_metadata.csv> <study_results.csv>");
    }

    let report = oncostat::pipeline::run_study(&metadata_path, &results_path)
        .with_context(|| format!("study pipeline failed for {metadata_path}, {results_path}"))?;

    println!("{}", report.to_json()?);
    Ok(())
}
