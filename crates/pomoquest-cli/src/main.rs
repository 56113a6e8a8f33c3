use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "pomoquest", version, about = "Pomodoro timer with tasks, points and ranks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the timer and progress state as JSON
    Status,
    /// Run the current phase in real time until it ends
    Run {
        /// Don't draw the countdown
        #[arg(long, short)]
        quiet: bool,
    },
    /// Advance the timer by simulated seconds
    Tick {
        #[arg(default_value = "1")]
        count: u32,
    },
    /// Reset timer, tasks and progress (history is kept)
    Reset,
    /// Change session length, break length or planned sessions
    Set {
        #[command(subcommand)]
        action: commands::timer::SetAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Completed session history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Points, level, streak and rank
    Progress,
    /// Alert permission
    Notifications {
        #[command(subcommand)]
        action: commands::notifications::NotificationsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("POMOQUEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::timer::status(),
        Commands::Run { quiet } => commands::timer::run(quiet),
        Commands::Tick { count } => commands::timer::tick(count),
        Commands::Reset => commands::timer::reset(),
        Commands::Set { action } => commands::timer::set(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Progress => commands::history::progress(),
        Commands::Notifications { action } => commands::notifications::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomoquest", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
