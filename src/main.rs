//! natfn CLI binary entry point.

use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use natfn::cli::{ChatInput, Cli, Commands, TurnFailure};
use natfn::config::NatfnConfig;
use natfn::tools::builtin::default_registry;
use natfn::tools::ItemStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.load_config() {
        Ok(config) => match cli.command {
            Commands::Call { texts } => handle_call(&config, &texts).await,
            Commands::Chat => handle_chat(&config).await,
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_call(config: &NatfnConfig, texts: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let items = ItemStore::new();
    let registry = default_registry(items, config.http_client()?)?;
    let caller = config.function_caller()?;

    for text in texts {
        let result = caller.call(text, &registry).await?;
        println!("{result}");
    }
    Ok(())
}

async fn handle_chat(config: &NatfnConfig) -> Result<(), Box<dyn std::error::Error>> {
    let items = ItemStore::new();
    let registry = default_registry(items.clone(), config.http_client()?)?;
    let mut agent = config.agent(Arc::new(registry))?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        match ChatInput::parse(&line?) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::Reset => {
                agent.reset();
                println!("(conversation cleared)");
            }
            ChatInput::Items => {
                for item in items.items() {
                    println!("{} at {}", item.item_name, item.time);
                }
            }
            ChatInput::Message(text) => match agent.chat(text).await {
                Ok(reply) => println!("{reply}"),
                Err(e) => match TurnFailure::classify(&e) {
                    TurnFailure::Retry => eprintln!("Error: {e} (temporary, send the message again)"),
                    TurnFailure::Continue => eprintln!("Error: {e}"),
                    TurnFailure::Abort => return Err(e.into()),
                },
            },
        }
    }
    Ok(())
}
