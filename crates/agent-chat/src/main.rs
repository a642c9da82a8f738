//! A terminal chat with the multi-agent backend, built on the `agent-chat`
//! library.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use agent_chat::command::Command;
use agent_chat::core::SendOutcome;
use agent_chat::core::trace::ANALYZING_STEP;
use agent_chat::{CliConfig, Session, SessionBuilder, render};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::select;
use tokio::time::sleep;

type Input = Lines<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    let session = SessionBuilder::with_config(&config).build();

    println!(
        "Chatting with {} as {}. Type {} for commands.",
        config.base_url.bold(),
        config.user_id.bold(),
        "/help".bright_cyan()
    );
    session.store().load_conversations().await;

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let mut input = BufReader::new(io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line(&mut input).await else {
            break;
        };
        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Send(text) => {
                send(&session, text, &progress_style).await;
            }
            Command::New => {
                session.store().new_chat();
                println!("{}", "Started a new conversation.".dimmed());
            }
            Command::List => {
                session.store().load_conversations().await;
                let state = session.store().state();
                println!(
                    "{}",
                    render::conversations(
                        state.conversations(),
                        state.current_conversation_id()
                    )
                );
            }
            Command::Open(selector) => match session.open(&selector).await {
                Ok(id) => {
                    let opened = format!("Opened conversation {id}.");
                    println!("{}", opened.dimmed());
                    for msg in session.store().state().messages() {
                        println!("{}", render::message(msg));
                    }
                }
                Err(err) => {
                    eprintln!(
                        "{} {err}",
                        "Failed to load conversation:".bright_red()
                    );
                }
            },
            Command::Trace => {
                let answer = session.latest_traced_answer();
                match answer.as_ref().and_then(|msg| msg.trace()) {
                    Some(trace) => println!("{}", render::trace(trace)),
                    None => println!("{}", "No trace to show yet.".dimmed()),
                }
            }
            Command::Agents => println!("{}", render::roster()),
            Command::Health => match session.store().check_health().await {
                Ok(status) => println!("{}", render::health(&status)),
                Err(err) => {
                    eprintln!("{} {err}", "Backend unreachable:".bright_red());
                }
            },
            Command::Help => println!("{}", render::help()),
            Command::Invalid(hint) => println!("{}", hint.bright_yellow()),
        }
    }
}

async fn send(
    session: &Session,
    text: String,
    progress_style: &ProgressStyle,
) {
    let mut state_rx = session.store().subscribe();

    let mut task = tokio::spawn({
        let session = session.clone();
        async move { session.send_message(&text).await }
    });

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style.clone());
    progress_bar.set_message(ANALYZING_STEP);
    let mut steps_shown = false;

    let outcome = loop {
        let sleep = sleep(Duration::from_millis(100));
        select! {
            outcome = &mut task => break outcome,
            Ok(()) = state_rx.changed() => {
                let state = state_rx.borrow_and_update().clone();
                let steps = state.thinking_steps();
                // Print the finished steps once, above the spinner.
                if !steps_shown && steps.first().is_some_and(|s| s.done) {
                    for step in steps {
                        progress_bar.println(render::step(step));
                    }
                    progress_bar.set_message("Preparing the answer...");
                    steps_shown = true;
                }
            }
            _ = sleep => progress_bar.tick(),
        }
    };

    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();

    match outcome {
        Ok(SendOutcome::Committed(steps)) => {
            // The steps may have come and gone between two state checks.
            if !steps_shown {
                for step in &steps {
                    println!("{}", render::step(step));
                }
            }
            if let Some(msg) = session.store().state().messages().last() {
                println!("{}", render::message(msg));
            }
        }
        Ok(SendOutcome::Failed(_)) => {
            for step in session.store().state().thinking_steps() {
                eprintln!("{}", render::step(step).bright_red());
            }
        }
        Ok(SendOutcome::Ignored | SendOutcome::Discarded) => {
            debug!("the message produced no answer");
        }
        Err(err) => {
            error!("send task failed: {err}");
        }
    }
}

async fn read_line(input: &mut Input) -> Option<String> {
    match input.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
