use std::error::Error;
use std::str::FromStr;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::client::view::{BoardView, ViewEffect};
use crate::network::messages::{deserialize_response, serialize_message, ClientMessage};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserCommand {
    Flip(usize),
    Start,
    Leave,
}

impl FromStr for UserCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("start"), None) => Ok(UserCommand::Start),
            (Some("leave" | "quit"), None) => Ok(UserCommand::Leave),
            (Some("flip" | "f"), Some(index)) | (Some(index), None) => index
                .parse()
                .map(UserCommand::Flip)
                .map_err(|_| format!("'{}' is not a card number", index)),
            _ => Err("commands: flip N, start, leave".to_string()),
        }
    }
}

/// What a front end should show after each change.
#[derive(Debug, Clone, Copy)]
pub enum Update<'a> {
    Board(&'a BoardView),
    Alert(&'a str),
}

pub struct GameSession {
    url: String,
    view: BoardView,
}

impl GameSession {
    pub fn new(url: &str, room: &str, name: &str) -> Self {
        Self {
            url: url.to_string(),
            view: BoardView::new(room, name),
        }
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Runs until the server ends the game, the socket closes or the user leaves.
    pub async fn run<F>(
        &mut self,
        mut commands: mpsc::UnboundedReceiver<UserCommand>,
        mut on_update: F,
    ) -> Result<(), Box<dyn Error>>
    where
        F: FnMut(Update<'_>),
    {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        tracing::info!(url = %self.url, "connected to game server");
        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        for intent in self.view.handshake() {
            ws_sender
                .send(Message::Text(serialize_message(&intent)?))
                .await?;
        }

        let (hide_sender, mut hide_receiver) = mpsc::unbounded_channel::<[usize; 2]>();

        loop {
            tokio::select! {
                frame = ws_receiver.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        let response = match deserialize_response(&text) {
                            Ok(response) => response,
                            Err(err) => {
                                tracing::warn!(%err, "ignoring unknown server event");
                                continue;
                            }
                        };
                        let mut exit = false;
                        for effect in self.view.apply(response) {
                            match effect {
                                ViewEffect::Alert(message) => on_update(Update::Alert(&message)),
                                ViewEffect::HideLater { indices, after } => {
                                    let hide_sender = hide_sender.clone();
                                    tokio::spawn(async move {
                                        tokio::time::sleep(after).await;
                                        let _ = hide_sender.send(indices);
                                    });
                                }
                                ViewEffect::Exit => exit = true,
                            }
                        }
                        on_update(Update::Board(&self.view));
                        if exit {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                },

                Some(indices) = hide_receiver.recv() => {
                    self.view.hide_temporary(&indices);
                    on_update(Update::Board(&self.view));
                }

                command = commands.recv() => {
                    let intent = match command {
                        Some(UserCommand::Flip(index)) => match self.view.click(index) {
                            Ok(intent) => intent,
                            Err(rejected) => {
                                on_update(Update::Alert(&rejected.to_string()));
                                continue;
                            }
                        },
                        Some(UserCommand::Start) => self.view.start(),
                        Some(UserCommand::Leave) | None => {
                            send_intent(&mut ws_sender, self.view.leave()).await?;
                            break;
                        }
                    };
                    send_intent(&mut ws_sender, intent).await?;
                }
            }
        }

        let _ = ws_sender.close().await;
        Ok(())
    }
}

async fn send_intent<S>(sink: &mut S, intent: ClientMessage) -> Result<(), Box<dyn Error>>
where
    S: Sink<Message> + Unpin,
    S::Error: Error + 'static,
{
    tracing::debug!(?intent, "sending intent");
    sink.send(Message::Text(serialize_message(&intent)?))
        .await
        .map_err(|err| Box::new(err) as Box<dyn Error>)
}
