use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::evaluation::driver::{evaluate_files, Evaluation, Halt};
use crate::evaluation::{EvaluationConfig, DEFAULT_MAX_UNAMBIGUOUS_ALIGNMENTS};
use crate::utils::validation::validate_inputs;

#[derive(Args)]
pub struct CompareArgs {
    /// Truth file: two lines per simulated read (may be gzipped)
    #[arg(required = true)]
    pub truth: PathBuf,

    /// Aligner output in SAM layout, sorted by read name (may be gzipped)
    #[arg(required = true)]
    pub called: PathBuf,

    /// Read length; taken from the first truth record's sequence if omitted
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub read_length: Option<u64>,

    /// Reads with more alignments than this count as ambiguous
    #[arg(long, default_value_t = DEFAULT_MAX_UNAMBIGUOUS_ALIGNMENTS)]
    pub max_alignments: usize,

    /// Print `matched:misaligned` for the first read that needs base-level
    /// comparison and stop, without a report
    #[arg(long)]
    pub stop_at_first_reconcile: bool,
}

pub fn run(args: CompareArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let summary = validate_inputs(&args.truth, &args.called)?;

    let read_length = match args.read_length {
        Some(n) => n,
        None => summary.inferred_read_length(&args.truth)?,
    };

    if verbose {
        eprintln!(
            "Reads {}..={}, read length {}",
            summary.truth.ids.first, summary.truth.ids.last, read_length
        );
    }

    let config = EvaluationConfig {
        read_length,
        max_unambiguous_alignments: args.max_alignments,
        stop_at_first_reconcile: args.stop_at_first_reconcile,
    };

    let result = evaluate_files(&args.truth, &args.called, &config)?;

    if let Some(halt) = &result.halted {
        match format {
            OutputFormat::Text => println!("{}", halt.reconciliation),
            OutputFormat::Json => print_json_halt(halt)?,
            OutputFormat::Tsv => print_tsv_halt(halt),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Text => print_text_report(&result),
        OutputFormat::Json => print_json_report(&args, read_length, &result)?,
        OutputFormat::Tsv => print_tsv_report(&result),
    }

    Ok(())
}

fn print_text_report(result: &Evaluation) {
    print!("{}", result.stats);
}

fn print_json_report(
    args: &CompareArgs,
    read_length: u64,
    result: &Evaluation,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "truth": args.truth.display().to_string(),
        "called": args.called.display().to_string(),
        "read_length": read_length,
        "reads": result.reads,
        "statistics": result.stats,
        "rates": result.stats.rates(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(result: &Evaluation) {
    let fields = result.stats.fields();
    let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let values: Vec<String> = fields.iter().map(|(_, value)| value.to_string()).collect();
    println!("{}", names.join("\t"));
    println!("{}", values.join("\t"));
}

fn print_json_halt(halt: &Halt) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(halt)?);
    Ok(())
}

fn print_tsv_halt(halt: &Halt) {
    println!("read_id\tmatched\tmisaligned");
    println!(
        "{}\t{}\t{}",
        halt.read_id, halt.reconciliation.matched, halt.reconciliation.misaligned
    );
}
