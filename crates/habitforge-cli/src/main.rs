use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "habitforge", version, about = "habitforge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Today's task list
    Today {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Preview of tomorrow's task list
    Tomorrow {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Discipline score breakdown
    Score,
    /// Weekly reflections
    Reflect {
        #[command(subcommand)]
        action: commands::reflect::ReflectAction,
    },
    /// Streak milestones
    Milestone {
        #[command(subcommand)]
        action: commands::milestone::MilestoneAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HABITFORGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Today { json } => commands::tasks::run(habitforge_core::DayView::Today, json),
        Commands::Tomorrow { json } => {
            commands::tasks::run(habitforge_core::DayView::Tomorrow, json)
        }
        Commands::Score => commands::tasks::score(),
        Commands::Reflect { action } => commands::reflect::run(action),
        Commands::Milestone { action } => commands::milestone::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "habitforge", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
