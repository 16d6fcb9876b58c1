//! goalrec CLI: goal states, problem templates, and goal recognition runs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

use goalrec::config::{DEFAULT_CONFIG_FILE, GoalRecConfig};
use goalrec::pipeline;

#[derive(Parser)]
#[command(name = "goalrec", version, about = "Goal recognition over kitchen activity relations")]
struct Cli {
    /// TOML configuration (groups, tracked goals, recognizer command) [default: goalrec.toml].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build goal states from the last frame of each recipe trial.
    GoalStates {
        /// Trial file, or a folder of `<index>-<recipe>` trial files.
        input: PathBuf,

        /// Output file (default: goal_states.dat in the input folder).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the problem template from the initial relations.
    Template {
        /// Configuration holding `objects`, `init`, and `groups` (default: --config).
        #[arg(short, long)]
        initfile: Option<PathBuf>,

        /// Output file (default: template.pddl next to the init file).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stream trials through the recognizer and save per-goal score tables.
    Recognize {
        /// Trial file, or a folder of trial files processed one after another.
        input: PathBuf,

        /// Folder for score tables (default: next to the input).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    match cli.command {
        Commands::GoalStates { input, output } => {
            // Goal states only need `groups`; an absent default file means none.
            let config =
                GoalRecConfig::load_or_default(cli.config.as_deref(), &config_path)?;
            let path = pipeline::generate_goal_states(&input, output.as_deref(), &config)?;
            println!("Goal states saved to {}", path.display());
        }

        Commands::Template { initfile, output } => {
            let init = initfile.unwrap_or(config_path);
            let config = GoalRecConfig::load(&init)?;
            let path = pipeline::generate_template(&init, output.as_deref(), &config)?;
            println!("Template saved to {}", path.display());
        }

        Commands::Recognize { input, output } => {
            let config = GoalRecConfig::load(&config_path)?;
            if config.goals.is_empty() {
                tracing::warn!("no goals configured, score tables will have no columns");
            }
            let summaries = pipeline::recognize(&input, output.as_deref(), &config)?;
            for s in &summaries {
                println!(
                    "{}: {} frames, {} recognizer requests -> {}",
                    s.input.display(),
                    s.frames,
                    s.requests,
                    s.scores.display()
                );
            }
        }
    }

    Ok(())
}
