//! Chat with a local model about a text file or a web page.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use docchat::command::{HELP, read_line};
use docchat::core::conversation::{Message, Role};
use docchat::core::{ChatSession, ChatSessionBuilder};
use docchat::{Command, Sidebar};
use docchat_ollama_model::{OllamaConfigBuilder, OllamaProvider};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, BufReader};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = OllamaConfigBuilder::new();
    if let Ok(model) = env::var("DOCCHAT_MODEL") {
        config = config.with_model(model);
    }
    if let Ok(base_url) = env::var("DOCCHAT_OLLAMA_URL") {
        config = config.with_base_url(base_url);
    }
    let model_provider = OllamaProvider::new(config.build());

    let mut session =
        ChatSessionBuilder::with_model_provider(model_provider).build();
    let mut sidebar = Sidebar::new();
    let mut stdin = BufReader::new(io::stdin());

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!(
        "Chatting with {}. Type /help for commands.",
        session.model_name().bold()
    );

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{}", err.bright_red());
                continue;
            }
        };

        match command {
            Command::Ask(question) => {
                ask(&mut session, &sidebar, question, &progress_style).await;
            }
            Command::File(path) => match sidebar.attach_file(path).await {
                Ok(()) => println!("Attached {}.", sidebar.describe()),
                Err(err) => println!("{}", err.bright_red()),
            },
            Command::Url(url) => {
                sidebar.set_url(url);
                println!("Context will be fetched from {url}.");
            }
            Command::ClearUrl => {
                sidebar.clear_url();
                println!("Context: {}.", sidebar.describe());
            }
            Command::Detach => {
                sidebar.clear();
                println!("Nothing attached.");
            }
            Command::History => {
                for message in session.conversation().all() {
                    render_message(message);
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }
}

async fn ask(
    session: &mut ChatSession,
    sidebar: &Sidebar,
    question: &str,
    progress_style: &ProgressStyle,
) {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style.clone());
    progress_bar.set_message("Assistant is typing...");
    progress_bar.enable_steady_tick(Duration::from_millis(100));

    let report = session
        .submit_streaming(question, sidebar.input(), {
            let progress_bar = progress_bar.clone();
            move |_| progress_bar.tick()
        })
        .await;

    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();

    let Some(report) = report else {
        return;
    };
    if let Some(notice) = &report.notice {
        println!("{}⚠️  {}", BAR_CHAR.bright_yellow(), notice);
    }
    match &report.response {
        Ok(answer) => render_message(&Message::assistant(answer.as_str())),
        Err(err) => {
            println!(
                "{}The model didn't answer: {}",
                BAR_CHAR.bright_red(),
                err
            );
        }
    }
}

fn render_message(message: &Message) {
    match message.role() {
        Role::User => {
            println!("{}🧑 {}", BAR_CHAR.bright_green(), message.content());
        }
        Role::Assistant => {
            println!(
                "{}🤖 {}",
                BAR_CHAR.bright_cyan(),
                message.content().bright_white()
            );
        }
    }
}
