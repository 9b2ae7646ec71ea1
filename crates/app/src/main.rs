use std::fmt;
use std::io::BufRead;
use std::path::PathBuf;

use tokio::sync::{mpsc, watch};

use engine::runtime::{Intent, drive};
use engine::{Feedback, Phase, RecallPhase, SessionEngine, SessionView};
use quiz_core::model::{ChallengeKind, SubmittedAnswer};

mod sets;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz   [--set <path.json>]");
    eprintln!("  cargo run -p app -- memory [--seed <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  quiz uses the bundled marketing set");
    eprintln!("  memory seeds itself from the OS");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SET, QUIZ_SEED");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Memory,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

struct Args {
    set_path: Option<PathBuf>,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut set_path = std::env::var("QUIZ_SET").ok().map(PathBuf::from);
        let mut seed = std::env::var("QUIZ_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--set" => {
                    let value = args.next().ok_or(ArgsError::MissingValue { flag: "--set" })?;
                    set_path = Some(PathBuf::from(value));
                }
                "--seed" => {
                    let value = args
                        .next()
                        .ok_or(ArgsError::MissingValue { flag: "--seed" })?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { set_path, seed })
    }
}

/// Map one line of input onto an intent, given the state on screen.
fn map_line(view: &SessionView, line: &str) -> Option<Intent> {
    match line {
        "q" | "quit" => return Some(Intent::Quit),
        "r" | "reset" => return Some(Intent::Reset),
        _ => {}
    }

    match view.phase {
        Phase::Idle => Some(Intent::Start),
        Phase::Introduction | Phase::Finished => None,
        Phase::Active => {
            let item = view.item.as_ref()?;
            match item.kind {
                ChallengeKind::OrderedSequence => {
                    if view.recall_phase != Some(RecallPhase::Recalling) {
                        return None;
                    }
                    if line.is_empty() {
                        return Some(Intent::ConfirmRecall);
                    }
                    if line == "u" {
                        return Some(Intent::UndoRecall);
                    }
                    let index: usize = line.parse().ok()?;
                    let entry = item.options.get(index.checked_sub(1)?)?;
                    Some(Intent::PushRecall(entry.clone()))
                }
                ChallengeKind::BooleanChoice => {
                    // Options are ordered [true label, false label].
                    match line.parse::<usize>().ok()? {
                        1 => Some(Intent::Submit(SubmittedAnswer::from(true))),
                        2 => Some(Intent::Submit(SubmittedAnswer::from(false))),
                        _ => None,
                    }
                }
                ChallengeKind::MultipleChoice => {
                    let index: usize = line.parse().ok()?;
                    let choice = item.options.get(index.checked_sub(1)?)?;
                    Some(Intent::Submit(SubmittedAnswer::from(choice.as_str())))
                }
            }
        }
    }
}

fn render(title: &str, view: &SessionView) {
    match view.phase {
        Phase::Idle => {
            println!("── {title} ──");
            println!("Press Enter to start. q quits, r resets.");
        }
        Phase::Introduction => {}
        Phase::Active => render_active(view),
        Phase::Finished => {
            println!();
            println!("Time! Final score: {}", view.score);
            if let Some(result) = &view.result {
                println!("{} {} ({} points)", result.badge, result.rank, result.points);
            }
            println!("q quits, r plays again.");
        }
    }
}

fn render_active(view: &SessionView) {
    let Some(item) = &view.item else {
        return;
    };

    let position = match view.total_items {
        Some(total) => format!("{}/{total}", view.current_index + 1),
        None => format!("round {}", view.current_index + 1),
    };
    println!();
    println!("[{position} · {}s left · score {}]", view.time_left_secs, view.score);

    match view.recall_phase {
        Some(RecallPhase::Showing) => {
            println!("Memorize this order:");
            for (index, entry) in item.options.iter().enumerate() {
                println!("  {}. {entry}", index + 1);
            }
        }
        Some(RecallPhase::Memorizing) => {
            println!("…keep it in mind…");
        }
        Some(RecallPhase::Recalling) => {
            println!("{}", item.prompt);
            for (index, entry) in item.options.iter().enumerate() {
                println!("  {}. {entry}", index + 1);
            }
            println!("So far: {:?}", view.partial_recall);
            println!("Pick numbers in order; u undoes, Enter confirms.");
        }
        None => {
            println!("{}", item.prompt);
            for (index, option) in item.options.iter().enumerate() {
                println!("  {}. {option}", index + 1);
            }
        }
    }

    match view.feedback {
        Feedback::None => {}
        Feedback::Correct => println!("✔ Correct."),
        Feedback::Incorrect => println!("✘ Not quite."),
    }
    if let Some(explanation) = item.explanation.as_deref()
        && !explanation.is_empty()
    {
        println!("  {explanation}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let set = match cmd {
        Command::Quiz => match &args.set_path {
            Some(path) => sets::from_file(path)?,
            None => sets::marketing_quiz()?,
        },
        Command::Memory => sets::memory_game(args.seed)?,
    };

    let engine = SessionEngine::new(set);
    let title = engine.title().to_string();

    let (intent_tx, intent_rx) = mpsc::channel::<Intent>(16);
    let (view_tx, mut view_rx) = watch::channel(engine.view());
    let session = tokio::spawn(drive(engine, intent_rx, view_tx));

    // Blocking stdin reader on its own thread; lines flow into the select loop.
    let (line_tx, mut line_rx) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    render(&title, &view_rx.borrow().clone());
    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = view_rx.borrow().clone();
                render(&title, &view);
            }
            line = line_rx.recv() => {
                let Some(line) = line else {
                    let _ = intent_tx.send(Intent::Quit).await;
                    break;
                };
                let view = view_rx.borrow().clone();
                if let Some(intent) = map_line(&view, line.trim()) {
                    let quitting = intent == Intent::Quit;
                    let _ = intent_tx.send(intent).await;
                    if quitting {
                        break;
                    }
                }
            }
        }
    }

    let _ = session.await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
