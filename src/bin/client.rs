use clap::Parser;
use memory_match::client::{GameSession, Update, UserCommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(name = "client", about = "Terminal client for the memory match server")]
struct ClientArgs {
    /// Server WebSocket URL
    #[arg(long, env = "MEMORY_MATCH_URL", default_value = "ws://127.0.0.1:5000")]
    url: String,

    /// Room code to join; a new room is created when omitted
    #[arg(long, default_value = "")]
    room: String,

    /// Display name shown to other players
    #[arg(long, default_value = "Player")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memory_match=warn,client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = ClientArgs::parse();
    println!("Welcome {}", args.name);
    println!("commands: flip N (or just N), start, leave");

    let (command_sender, command_receiver) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<UserCommand>() {
                Ok(command) => {
                    if command_sender.send(command).is_err() {
                        break;
                    }
                }
                Err(message) => eprintln!("{}", message),
            }
        }
    });

    let mut session = GameSession::new(&args.url, &args.room, &args.name);
    session
        .run(command_receiver, |update| match update {
            Update::Board(view) => println!("\n{}", view),
            Update::Alert(message) => println!("!! {}", message),
        })
        .await?;

    println!("Bye {}", args.name);
    Ok(())
}
