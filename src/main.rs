use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use letter_coach::presentation::{ConsolePresenter, OutputFormat};
use letter_coach::recognition::ConsoleRecognizer;
use letter_coach::{Config, Letter, Lexicon, SessionMachine, Trainer, TrainerHandle};

/// Letter Coach - say the letter on screen, get instant feedback
#[derive(Parser)]
#[command(name = "letter-coach", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (defaults to ~/.config/letter-coach/config.toml)
    #[arg(short, long, env = "LETTER_COACH_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for the letter sequence
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a round, typing what the speech engine would hear
    Play {
        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Score a phrase against one letter or all of them
    Score {
        /// Phrase as heard
        phrase: String,
        /// Only score this letter
        #[arg(short, long)]
        letter: Option<Letter>,
    },
    /// Resolve candidate phrases to a letter
    Resolve {
        /// Letter the player was asked for
        #[arg(short, long)]
        expected: Option<Letter>,
        /// Candidate phrases, best first
        candidates: Vec<String>,
    },
    /// Print the spoken forms of every letter
    Lexicon,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info",
        1 => "info,letter_coach=debug",
        2 => "debug",
        _ => "trace",
    };

    // stdout belongs to the trainer screen
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded configuration");

    let lexicon = config.lexicon()?;

    match cli.command.unwrap_or(Command::Play { json: false }) {
        Command::Play { json } => play(config, lexicon, cli.seed, json).await,
        Command::Score { phrase, letter } => {
            score(&lexicon, &phrase, letter);
            Ok(())
        }
        Command::Resolve {
            expected,
            candidates,
        } => {
            resolve(&lexicon, &candidates, expected);
            Ok(())
        }
        Command::Lexicon => {
            print_lexicon(&lexicon);
            Ok(())
        }
    }
}

async fn play(config: Config, lexicon: Lexicon, seed: Option<u64>, json: bool) -> anyhow::Result<()> {
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let (line_tx, line_rx) = mpsc::channel(16);
    let recognizer = Arc::new(ConsoleRecognizer::new(line_rx));
    let presenter = Arc::new(ConsolePresenter::new(format));
    let machine = SessionMachine::new(config.session.clone(), Arc::new(lexicon), seed);
    let (trainer, handle) = Trainer::new(machine, recognizer, presenter, config.recognition);

    if !json {
        println!("Say (type) the letter shown. Controls: :skip  :restart  :quit");
    }

    spawn_input_reader(line_tx, handle.clone());

    let on_ctrl_c = handle;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted");
            let _ = on_ctrl_c.leave();
        }
    });

    let state = trainer.run().await;
    tracing::info!(
        correct = state.correct,
        total = state.total(),
        "session finished"
    );
    Ok(())
}

/// Read stdin on a plain thread; control lines go to the trainer, the rest to the recognizer
fn spawn_input_reader(lines: mpsc::Sender<String>, handle: TrainerHandle) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };

            let delivered = match line.trim() {
                ":quit" | ":q" => break,
                ":skip" => handle.skip(),
                ":restart" => handle.restart(),
                _ => lines.blocking_send(line).is_ok(),
            };
            if !delivered {
                return;
            }
        }

        let _ = handle.leave();
    });
}

fn score(lexicon: &Lexicon, phrase: &str, letter: Option<Letter>) {
    if let Some(letter) = letter {
        println!("{letter}: {}", lexicon.score(phrase, letter).value());
        return;
    }

    for letter in Letter::all() {
        let score = lexicon.score(phrase, letter);
        if score.value() > 0 {
            println!("{letter}: {}", score.value());
        }
    }
}

fn resolve(lexicon: &Lexicon, candidates: &[String], expected: Option<Letter>) {
    for evidence in lexicon.rank(candidates, expected) {
        let marker = if Some(evidence.letter) == expected { " (expected)" } else { "" };
        println!(
            "{}: score {} biased {}{marker}",
            evidence.letter,
            evidence.score.value(),
            evidence.biased
        );
    }

    match lexicon.resolve(candidates, expected) {
        Some(letter) => println!("resolved: {letter}"),
        None => println!("resolved: none"),
    }
}

fn print_lexicon(lexicon: &Lexicon) {
    for letter in Letter::all() {
        println!("{letter}: {}", lexicon.forms(letter).join(", "));
    }
}
