use clap::Subcommand;
use habitforge_core::MILESTONES;

use super::{open_session, start_session, CliResult};

#[derive(Subcommand)]
pub enum MilestoneAction {
    /// Show a newly reached milestone, if any
    Check,
    /// Milestones already shown, per habit
    List,
    /// Thresholds and their messages
    Thresholds,
}

pub fn run(action: MilestoneAction) -> CliResult {
    match action {
        MilestoneAction::Check => {
            let (_, milestone) = start_session();
            match milestone {
                Some(m) => println!("Milestone reached for {}: {}", m.habit_name, m.message),
                None => println!("no new milestone"),
            }
        }
        MilestoneAction::List => {
            let session = open_session();
            println!("{}", serde_json::to_string_pretty(session.store().milestones())?);
        }
        MilestoneAction::Thresholds => {
            for (threshold, message) in MILESTONES {
                println!("{threshold:>3} days: {message}");
            }
        }
    }
    Ok(())
}
