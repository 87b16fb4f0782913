//! Today/tomorrow task lists and the discipline score.

use chrono::Utc;
use habitforge_core::DayView;

use super::{open_session, CliResult};

pub fn run(day: DayView, json: bool) -> CliResult {
    let mut session = open_session();
    session.set_day_view(day);
    let view = session.view(Utc::now());
    let tasks = view.tasks;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    println!("{} ({}/{} done)", day.label(), tasks.completed, tasks.total);
    if tasks.tasks.is_empty() {
        println!("No habits yet. Add one with `habitforge habit add <name>`.");
    }
    for task in &tasks.tasks {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{mark}] {:<6} {} (day {}, streak {}, best {})",
            task.habit_id, task.name, task.target_day, task.current_streak, task.best_streak
        );
        if !task.why.is_empty() {
            println!("           {}", task.why);
        }
    }
    if day == DayView::Tomorrow {
        println!("Preview only. Tomorrow's list can be marked tomorrow.");
    }
    Ok(())
}

pub fn score() -> CliResult {
    let session = open_session();
    let view = session.view(Utc::now());
    println!("{}", serde_json::to_string_pretty(&view.score)?);
    Ok(())
}
