//! Terminal front-end for the todo API
//!
//! Reads commands from stdin and redraws the list after each one.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_client::controller::Command;
use todo_client::input::{parse_line, Action, HELP};
use todo_client::view::render;
use todo_client::{HttpTodoClient, TodoController};

const API_URL_VAR: &str = "TODO_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:8081";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not interleave with the rendered list
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api_url = std::env::var(API_URL_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    tracing::info!("Using API at {}", api_url);

    let mut controller = TodoController::new(HttpTodoClient::new(api_url));
    controller.handle(Command::Mount).await;
    print!("{}", render(controller.state()));
    println!("(type `help` for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line, controller.state()) {
            Ok(Action::Quit) => break,
            Ok(Action::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Action::Redraw) => {}
            Ok(Action::Run(commands)) => {
                for command in commands {
                    controller.handle(command).await;
                }
            }
            Err(message) => {
                println!("{message}");
                continue;
            }
        }
        print!("{}", render(controller.state()));
    }

    controller.handle(Command::Unmount).await;
    Ok(())
}
