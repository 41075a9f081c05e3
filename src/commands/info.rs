use crate::read_metadata::read_election;
use crate::util::hash_file;
use colored::Colorize;
use std::error::Error;
use std::path::Path;

/// Validate an election file and dump what a run would use.
pub fn info(election_file: &Path) -> Result<(), Box<dyn Error>> {
    let config = read_election(election_file)?;

    println!("🗳️  Election: {}", config.name.bright_cyan());
    println!(
        "🪑 Seats: {}",
        config.params.seats.to_string().bright_yellow()
    );
    println!(
        "📏 Qualifying threshold: {}%",
        config.params.threshold_percent.to_string().bright_yellow()
    );

    if config.votes_path.exists() {
        println!(
            "📁 Votes file: {} (sha1 {})",
            config.votes_path.display(),
            hash_file(&config.votes_path)?.dimmed()
        );
    } else {
        println!(
            "📁 Votes file: {} {}",
            config.votes_path.display(),
            "(missing)".red()
        );
    }

    println!("🚫 Dropped columns: {}", config.dropped_columns.join(", "));

    if config.agreements.is_empty() {
        println!("🤝 No surplus agreements");
    } else {
        println!("🤝 {} surplus agreements:", config.agreements.len());
        for agreement in config.agreements.iter() {
            println!("  {}", agreement.alliance_key().green());
        }
    }

    Ok(())
}
