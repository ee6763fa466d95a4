use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::utils::validation::{validate_inputs, InputSummary};

#[derive(Args)]
pub struct ValidateArgs {
    /// Truth file (may be gzipped)
    #[arg(required = true)]
    pub truth: PathBuf,

    /// Aligner output in SAM layout (may be gzipped)
    #[arg(required = true)]
    pub called: PathBuf,
}

pub fn run(args: ValidateArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let summary = validate_inputs(&args.truth, &args.called)?;
    let read_length = summary.inferred_read_length(&args.truth).ok();

    match format {
        OutputFormat::Text => print_text_summary(&args, &summary, read_length),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "truth": args.truth.display().to_string(),
                "called": args.called.display().to_string(),
                "first_read": summary.truth.ids.first,
                "last_read": summary.truth.ids.last,
                "read_length": read_length,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("first_read\tlast_read\tread_length");
            println!(
                "{}\t{}\t{}",
                summary.truth.ids.first,
                summary.truth.ids.last,
                read_length.map_or_else(|| "NA".to_string(), |n| n.to_string())
            );
        }
    }

    Ok(())
}

fn print_text_summary(args: &ValidateArgs, summary: &InputSummary, read_length: Option<u64>) {
    println!("Inputs are consistent");
    println!("  Truth:  {}", args.truth.display());
    println!("  Called: {}", args.called.display());
    println!(
        "  Reads:  {}..={}",
        summary.truth.ids.first, summary.truth.ids.last
    );
    match read_length {
        Some(n) => println!("  Read length: {n}"),
        None => println!("  Read length: unknown (pass --read-length to compare)"),
    }
}
