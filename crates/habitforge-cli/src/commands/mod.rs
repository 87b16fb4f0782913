//! Subcommands and the session plumbing they share.

pub mod config;
pub mod habit;
pub mod milestone;
pub mod reflect;
pub mod tasks;

use chrono::Utc;
use habitforge_core::{
    Config, KeyValueStore, MemoryStore, Milestone, SqliteStore, TaskKind, Tracker, TrackerView,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub type Session = Tracker<Box<dyn KeyValueStore>>;

/// Start a tracker and announce anything its startup checks raised.
///
/// A milestone crossed since the last run goes to stderr so that JSON on
/// stdout stays parseable.
pub fn open_session() -> Session {
    let (session, milestone) = start_session();
    if let Some(m) = milestone {
        eprintln!("Milestone reached for {}: {}", m.habit_name, m.message);
    }
    session
}

/// Start a tracker over the on-disk store.
///
/// If the database cannot be opened the session still runs, in memory
/// only, and the user is told once. The startup milestone, if any, is
/// handed back and taken off the tracker, so later views only carry
/// milestones reached by this command's own actions.
pub fn start_session() -> (Session, Option<Milestone>) {
    let now = Utc::now();
    let config = Config::load_or_default();
    let storage: Box<dyn KeyValueStore> = match SqliteStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "could not open database");
            Box::new(MemoryStore::unavailable())
        }
    };
    let mut session = Tracker::start(storage, config, now);
    let milestone = session.milestone().cloned();
    session.dismiss_milestone(now);
    if session
        .scheduler()
        .pending()
        .iter()
        .any(|t| t.kind == TaskKind::ShowReflectionPrompt)
    {
        eprintln!("A week has passed. Record a reflection with `habitforge reflect add`.");
    }
    report_problems(&mut session);
    (session, milestone)
}

/// Print storage problems raised since the last call.
pub fn report_problems(session: &mut Session) {
    for event in session.drain_events() {
        if let Some(message) = event.user_message() {
            eprintln!("warning: {message}");
        }
    }
}

/// Print the milestone banner, if one is up.
pub fn print_milestone(view: &TrackerView) {
    if let Some(m) = &view.milestone {
        println!("Milestone reached for {}: {}", m.habit_name, m.message);
    }
}
