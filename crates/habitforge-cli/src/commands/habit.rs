//! Habit management commands for CLI.

use std::io::{BufRead, Write};

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use habitforge_core::window::{self, HistoryCell};
use habitforge_core::{DayView, HabitCard, HabitInput};

use super::{open_session, print_milestone, report_problems, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Days to reach the goal (default: habits.default_goal)
        #[arg(long)]
        goal: Option<i64>,
        /// Why this habit matters
        #[arg(long)]
        why: Option<String>,
        /// Start date, YYYY-MM-DD (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// List habits
    List,
    /// Get habit details
    Show {
        /// Habit ID
        id: i64,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit ID
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Flip completion of a day number
    Toggle {
        /// Habit ID
        id: i64,
        /// Day number, 1 = the day the habit was created
        day: i64,
    },
    /// Flip completion of today
    Done {
        /// Habit ID
        id: i64,
    },
    /// Day grid from day 1 to the goal
    History {
        /// Habit ID
        id: i64,
        /// Only the last two weeks
        #[arg(long)]
        recent: bool,
    },
    /// Current calendar week
    Week {
        /// Habit ID
        id: i64,
    },
}

pub fn run(action: HabitAction) -> CliResult {
    let mut session = open_session();
    let now = Utc::now();

    match action {
        HabitAction::Add {
            name,
            goal,
            why,
            start,
        } => {
            let mut input = HabitInput::new(name);
            if let Some(goal) = goal {
                input = input.goal(goal);
            }
            if let Some(why) = why {
                input = input.why(why);
            }
            if let Some(start) = start {
                input = input.start_date(start);
            }
            let view = session.add_habit(input, now)?;
            report_problems(&mut session);
            if let Some(card) = view.habits.last() {
                println!("Habit created: {}", card.id);
                println!("{}", serde_json::to_string_pretty(card)?);
            }
        }
        HabitAction::List => {
            let view = session.view(now);
            println!("{}", serde_json::to_string_pretty(&view.habits)?);
        }
        HabitAction::Show { id } => {
            let view = session.view(now);
            let card = find_card(&view.habits, id)?;
            println!("{}", serde_json::to_string_pretty(card)?);
        }
        HabitAction::Delete { id, yes } => {
            let name = session
                .habits()
                .iter()
                .find(|h| h.id == id)
                .map(|h| h.name.clone())
                .ok_or(format!("Habit not found: {id}"))?;
            if !yes && !confirm(&format!("Delete \"{name}\" and all its history?"))? {
                println!("cancelled");
                return Ok(());
            }
            session.delete_habit(id, now)?;
            report_problems(&mut session);
            println!("Habit deleted: {id}");
        }
        HabitAction::Toggle { id, day } => {
            let view = session.toggle_day(id, day, now)?;
            report_problems(&mut session);
            let completed = session.habits().iter().any(|h| h.id == id && h.is_completed(day));
            print_toggle(find_card(&view.habits, id)?, day, completed);
            print_milestone(&view);
        }
        HabitAction::Done { id } => {
            let view = session.toggle_from_tasks(id, DayView::Today, now)?;
            report_problems(&mut session);
            let card = find_card(&view.habits, id)?;
            let day = card.days_since_creation;
            let completed = session.habits().iter().any(|h| h.id == id && h.is_completed(day));
            print_toggle(card, day, completed);
            print_milestone(&view);
        }
        HabitAction::History { id, recent } => {
            let habit = session
                .habits()
                .iter()
                .find(|h| h.id == id)
                .ok_or(format!("Habit not found: {id}"))?;
            let today = habit.days_since_creation(now, session.store().zone());
            if recent {
                println!("{}", render_row(&window::recent_days(habit, today)));
            } else {
                for week in window::full_history(habit, today) {
                    println!("W{:<3} {}", week.week_number, render_row(&week.cells));
                }
            }
        }
        HabitAction::Week { id } => {
            let view = session.view(now);
            let card = find_card(&view.habits, id)?;
            for day in &card.week {
                let mark = match (day.completed, day.is_future) {
                    (true, _) => "x",
                    (false, true) => " ",
                    (false, false) => ".",
                };
                let today = if day.is_today { " <- today" } else { "" };
                println!("{} day {:>3} [{mark}]{today}", day.date.format("%a %Y-%m-%d"), day.day);
            }
        }
    }
    Ok(())
}

fn find_card(cards: &[HabitCard], id: i64) -> Result<&HabitCard, String> {
    cards
        .iter()
        .find(|c| c.id == id)
        .ok_or(format!("Habit not found: {id}"))
}

fn print_toggle(card: &HabitCard, day: i64, completed: bool) {
    let state = if completed { "done" } else { "not done" };
    println!(
        "{} day {day}: {state} | streak {} (best {}) | {} {}",
        card.name,
        card.current_streak,
        card.best_streak,
        card.progress.label(),
        card.stage_message
    );
}

fn render_row(cells: &[HistoryCell]) -> String {
    cells
        .iter()
        .map(|c| {
            let mark = if c.completed {
                'x'
            } else if c.is_future {
                '-'
            } else {
                '.'
            };
            if c.editable() {
                format!("[{mark}]")
            } else {
                format!(" {mark} ")
            }
        })
        .collect()
}

fn confirm(question: &str) -> std::io::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
