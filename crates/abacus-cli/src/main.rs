//! Abacus CLI
//!
//! Classify exercises, inspect single steps and practice interactively.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use abacus_core::{
    classify, Config, Cycle, PracticeSession, StepRequest, StepResult, StepStatus, Tutor, Verdict,
};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Abacus - stepwise arithmetic tutor
///
/// Breaks an exercise such as "47 + 28" or "3/4 + 1/2" into the small
/// steps of the written method and checks each answer, with hints that
/// grow more concrete after every mistake.
#[derive(Parser, Debug)]
#[command(name = "abacus")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: abacus.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Educational cycle tag (c1, c2 or c3), overrides the config file
    #[arg(long, value_name = "TAG", global = true)]
    cycle: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show how an exercise is recognized and the steps it decomposes into
    Classify {
        /// The exercise text, e.g. "47 + 28"
        text: String,

        /// Print the classified exercise as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute a single step, as a calling application would
    Step {
        /// The exercise text
        text: String,

        /// Step index (0-based)
        #[arg(short, long, default_value_t = 0)]
        step: usize,

        /// Consecutive wrong answers on this step
        #[arg(short, long, default_value_t = 0)]
        errors: u32,

        /// The student's last answer (a help request shows a hint)
        #[arg(short, long)]
        answer: Option<String>,

        /// Print the step result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Practice an exercise interactively, answering on standard input
    Practice {
        /// The exercise text (asked for when omitted)
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, cycle = ?args.cycle, "Starting abacus");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(tag) = args.cycle.as_deref() {
        config.cycle = Cycle::from_tag(tag);
    }

    match args.command {
        Command::Classify { text, json } => run_classify(config, &text, json),
        Command::Step {
            text,
            step,
            errors,
            answer,
            json,
        } => {
            let mut request = StepRequest::at(step).with_errors(errors);
            if let Some(answer) = answer {
                request = request.with_answer(answer);
            }
            run_step(config, &text, &request, json).await
        }
        Command::Practice { text } => run_practice(config, text).await,
    }
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

fn run_classify(config: Config, text: &str, json: bool) -> anyhow::Result<()> {
    let exercise = classify(text)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&exercise)?);
        return Ok(());
    }

    let plan = Tutor::new(config).plan(text)?;
    println!("Exercise: {}", exercise.canonical());
    println!("  Rule: {}", exercise.rule);
    println!("  Topic: {}", exercise.topic());
    println!("  Steps: {}", plan.step_count());
    println!("  Answer: {}", plan.final_answer);
    if plan.operands_swapped {
        println!("  Note: operands swapped so the difference is not negative");
    }
    println!();
    println!("{}", plan.transcript());
    Ok(())
}

async fn run_step(
    config: Config,
    text: &str,
    request: &StepRequest,
    json: bool,
) -> anyhow::Result<()> {
    let result = Tutor::new(config).step(text, request).await;
    if json {
        println!("{}", result.to_json_pretty()?);
        return Ok(());
    }

    print_result(&result);
    if let Some(expected) = &result.expected_answer {
        println!("  Expected: {expected}");
    }
    println!("  Next step: {}", result.next_step);
    if result.status == StepStatus::Error {
        anyhow::bail!("{}", result.message);
    }
    Ok(())
}

async fn run_practice(config: Config, text: Option<String>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let text = match text {
        Some(text) => text,
        None => {
            prompt("Exercise")?;
            match lines.next_line().await? {
                Some(line) if !line.trim().is_empty() => line,
                _ => anyhow::bail!(
                    "No exercise given\n\nSuggestion: Pass it as an argument, e.g. abacus practice \"47 + 28\""
                ),
            }
        }
    };

    let tutor = Tutor::new(config);
    let mut session = tutor.start(&text).await?;
    println!("Let's work out {} together.", session.text);
    print_result(session.current());

    while !session.is_finished() {
        prompt("Answer")?;
        let Some(line) = lines.next_line().await? else {
            println!();
            println!("See you next time!");
            break;
        };

        let outcome = tutor.submit(&mut session, &line).await;
        match outcome.verdict {
            Verdict::Correct if outcome.is_finished() => {
                println!("Correct!");
                println!("{}", outcome.result.message);
            }
            Verdict::Correct => {
                println!("Correct!");
                print_result(&outcome.result);
            }
            Verdict::Incorrect => {
                println!("Not quite, let's look again.");
                print_hint(&outcome.result);
            }
            Verdict::HelpShown => print_hint(&outcome.result),
            Verdict::AlreadyFinished => break,
        }
    }

    print_summary(&session);
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<()> {
    print!("{label}> ");
    std::io::stdout().flush()?;
    Ok(())
}

/// Prints a step result in plain text.
fn print_result(result: &StepResult) {
    match result.status {
        StepStatus::Ask => {
            println!(
                "[step {}/{}] {}",
                result.step_index + 1,
                result.step_count,
                result.message
            );
        }
        StepStatus::Done => println!("[done] {}", result.message),
        StepStatus::Error => println!("[error] {}", result.message),
    }
    print_hint(result);
}

fn print_hint(result: &StepResult) {
    if let Some(hint) = &result.hint {
        println!("  Hint: {hint}");
    }
}

/// Prints a summary of the practice session.
fn print_summary(session: &PracticeSession) {
    println!();
    println!("=== Practice Summary ===");
    println!("Exercise: {}", session.text);
    println!("Status: {}", if session.is_finished() { "completed" } else { "stopped" });
    println!("Correct answers: {}", session.correct_count());
    println!("Mistakes: {}", session.mistake_count());

    let elapsed = session.elapsed();
    println!(
        "Duration: {}m {}s",
        elapsed.num_minutes(),
        elapsed.num_seconds() % 60
    );
}
