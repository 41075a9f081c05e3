use crate::allocation::{allocate_mandates, AllocationOutcome};
use crate::formats::read_vote_tally;
use crate::read_metadata::{read_election, ElectionConfig};
use crate::reporting::{ConsoleReporter, Reporter, SilentReporter, Verbosity};
use crate::util::{hash_file, write_serialized};
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;
use std::error::Error;
use std::path::Path;

/// Machine-readable record of one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    pub election: String,
    pub votes_file: String,
    pub votes_sha1: String,
    pub agreements: Vec<String>,
    pub outcome: AllocationOutcome,
}

/// Read the votes named by `config`, run the allocation, and wrap the outcome
/// with the provenance a saved report carries.
pub fn build_report(
    config: &ElectionConfig,
    reporter: &mut dyn Reporter,
) -> Result<AllocationReport, Box<dyn Error>> {
    let votes = read_vote_tally(&config.votes_path, &config.dropped_columns)?;
    let votes_sha1 = hash_file(&config.votes_path)?;
    let outcome = allocate_mandates(&votes, &config.params, &config.agreements, reporter)?;

    Ok(AllocationReport {
        election: config.name.clone(),
        votes_file: config.votes_path.display().to_string(),
        votes_sha1,
        agreements: config
            .agreements
            .iter()
            .map(|agreement| agreement.alliance_key())
            .collect(),
        outcome,
    })
}

pub fn allocate(
    election_file: &Path,
    verbosity: Verbosity,
    output: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let config = read_election(election_file)?;

    if verbosity >= Verbosity::Summary {
        println!(
            "🚀 Calculating mandates for {}",
            config.name.bright_cyan()
        );
        println!("📁 Reading {}", config.votes_path.display());
    }

    let mut reporter: Box<dyn Reporter> = match verbosity {
        Verbosity::Quiet => Box::new(SilentReporter),
        _ => Box::new(ConsoleReporter::new(verbosity)),
    };
    let report = build_report(&config, reporter.as_mut())?;
    let outcome = &report.outcome;

    if outcome.final_seats.is_empty() {
        println!("{}", "No party passed the threshold".yellow());
        return Ok(());
    }

    println!(
        "{} ({} parties)",
        "FINAL MANDATES DISTRIBUTION:".bright_green().bold(),
        outcome.final_seats.len()
    );
    let ranked = outcome
        .final_seats
        .iter()
        .sorted_by(|(a_party, a_seats), (b_party, b_seats)| {
            b_seats.cmp(a_seats).then_with(|| a_party.cmp(b_party))
        });
    for (party, seats) in ranked {
        println!("  {:>4}  {}", seats.to_string().bright_yellow(), party);
    }

    if let Some(output) = output {
        write_serialized(output, &report)?;
        if verbosity >= Verbosity::Summary {
            println!("✅ Report written: {}", output.display().to_string().bright_green());
        }
    }

    Ok(())
}
