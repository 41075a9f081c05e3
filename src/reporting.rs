/// Progress reporting for the allocation stages.
///
/// Every stage receives a `&mut dyn Reporter`, so callers choose how much
/// of the calculation is shown without any process-wide switch.
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Summary,
    Detailed,
}

pub trait Reporter {
    /// Top-level progress: totals, stage results, the final distribution.
    fn summary(&mut self, message: &str);

    /// Sub-problem iteration: per-round quotients and alliance splits.
    fn detail(&mut self, message: &str);
}

pub struct ConsoleReporter {
    verbosity: Verbosity,
}

impl ConsoleReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Reporter for ConsoleReporter {
    fn summary(&mut self, message: &str) {
        if self.verbosity >= Verbosity::Summary {
            println!("{}", message);
        }
    }

    fn detail(&mut self, message: &str) {
        if self.verbosity >= Verbosity::Detailed {
            println!("    {}", message.dimmed());
        }
    }
}

pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn summary(&mut self, _message: &str) {}

    fn detail(&mut self, _message: &str) {}
}
