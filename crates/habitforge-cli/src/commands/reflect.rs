use chrono::Utc;
use clap::Subcommand;
use habitforge_core::reflection::{self, PromptCheck};
use habitforge_core::ReflectionInput;

use super::{open_session, report_problems, CliResult};

#[derive(Subcommand)]
pub enum ReflectAction {
    /// Record a weekly reflection (at least one field)
    Add {
        /// What worked this week
        #[arg(long, default_value = "")]
        worked: String,
        /// What didn't work
        #[arg(long, default_value = "")]
        didnt: String,
        /// What to improve next week
        #[arg(long, default_value = "")]
        improve: String,
    },
    /// List reflections, newest first
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Whether a reflection is due
    Check,
}

pub fn run(action: ReflectAction) -> CliResult {
    let mut session = open_session();
    let now = Utc::now();

    match action {
        ReflectAction::Add {
            worked,
            didnt,
            improve,
        } => {
            let input = ReflectionInput {
                worked,
                didnt,
                improve,
            };
            session.save_reflection(input, now)?;
            report_problems(&mut session);
            if let Some(saved) = session.reflections().first() {
                println!("Reflection saved: {}", saved.id);
            }
        }
        ReflectAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.reflections())?);
                return Ok(());
            }
            if session.reflections().is_empty() {
                println!("no reflections yet");
            }
            for r in session.reflections() {
                println!("{}", r.date.format("%Y-%m-%d"));
                for (label, text) in r.sections() {
                    println!("  {label}: {text}");
                }
            }
        }
        ReflectAction::Check => {
            let interval = i64::from(session.config().reflection.interval_days);
            match reflection::check_weekly(session.store().last_prompt(), now, interval) {
                PromptCheck::Due => println!("due"),
                PromptCheck::NotDue { days_remaining } => {
                    println!("not due ({days_remaining} days remaining)")
                }
                PromptCheck::Initialize => println!("not due"),
            }
        }
    }
    Ok(())
}
