//! Local mirror of a room as seen by one player.
//!
//! Every field here is copied from server events. The view never decides
//! whether a pair matches or whose turn it is; it only renders what it was
//! told and turns clicks into intents.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::network::messages::{ClientMessage, PlayerScore, ServerResponse};

/// How long a mismatched pair stays visible before the view hides it.
pub const HIDE_DELAY: Duration = Duration::from_millis(700);

const TILES_PER_ROW: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEffect {
    Alert(String),
    HideLater { indices: [usize; 2], after: Duration },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClickRejected {
    #[error("Waiting for game to start or sync.")]
    WaitingForSync,
    #[error("Not your turn")]
    NotYourTurn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tile {
    Matched,
    FaceUp(String),
    Pending,
    FaceDown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLine {
    pub name: String,
    pub score: u32,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct BoardView {
    room: String,
    my_name: String,
    card_count: usize,
    revealed: Vec<bool>,
    temp: Vec<usize>,
    faces: HashMap<usize, String>,
    players: Vec<PlayerScore>,
    current_turn: Option<usize>,
    host: Option<String>,
    started: bool,
}

impl BoardView {
    pub fn new(room: &str, my_name: &str) -> Self {
        Self {
            room: room.trim().to_ascii_uppercase(),
            my_name: my_name.to_string(),
            card_count: 0,
            revealed: Vec::new(),
            temp: Vec::new(),
            faces: HashMap::new(),
            players: Vec::new(),
            current_turn: None,
            host: None,
            started: false,
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn current_turn(&self) -> Option<usize> {
        self.current_turn
    }

    pub fn players(&self) -> &[PlayerScore] {
        &self.players
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Intents sent right after connecting. Non-hosts get a harmless
    /// `create_failed` back for the second one.
    pub fn handshake(&self) -> Vec<ClientMessage> {
        let name = Some(self.my_name.clone());
        if self.room.is_empty() {
            return vec![ClientMessage::CreateRoom { room: None, name }];
        }
        vec![
            ClientMessage::JoinRoom {
                room: self.room.clone(),
                name: name.clone(),
            },
            ClientMessage::CreateRoom {
                room: Some(self.room.clone()),
                name,
            },
        ]
    }

    pub fn apply(&mut self, response: ServerResponse) -> Vec<ViewEffect> {
        match response {
            ServerResponse::RoomCreated { room } | ServerResponse::JoinOk { room } => {
                if self.room.is_empty() {
                    self.room = room;
                }
                Vec::new()
            }
            ServerResponse::LobbyUpdate { host, started, .. } => {
                self.host = host;
                self.started = started;
                Vec::new()
            }
            ServerResponse::GameStarted {
                card_count,
                players,
                current_turn,
            } => {
                self.card_count = card_count;
                self.players = players;
                self.current_turn = Some(current_turn);
                self.started = true;
                Vec::new()
            }
            ServerResponse::BoardState {
                revealed,
                temp,
                players,
                current_turn,
            } => {
                self.revealed = revealed;
                self.faces.retain(|index, _| temp.contains(index));
                self.temp = temp;
                self.players = players;
                self.current_turn = Some(current_turn);
                Vec::new()
            }
            ServerResponse::CardFlipped { index, value } => {
                self.faces.insert(index, value);
                Vec::new()
            }
            ServerResponse::MatchResult {
                matched, indices, ..
            } => {
                if matched {
                    for index in indices {
                        self.mark_revealed(index);
                    }
                    Vec::new()
                } else {
                    vec![ViewEffect::HideLater {
                        indices,
                        after: HIDE_DELAY,
                    }]
                }
            }
            ServerResponse::GameOver { players } => {
                self.players = players;
                vec![ViewEffect::Alert(self.game_over_message()), ViewEffect::Exit]
            }
            ServerResponse::Error { msg } | ServerResponse::TurnError { msg } => {
                vec![ViewEffect::Alert(msg)]
            }
            ServerResponse::JoinFailed { reason } => {
                vec![ViewEffect::Alert(reason), ViewEffect::Exit]
            }
            ServerResponse::Connected { .. }
            | ServerResponse::Pong
            | ServerResponse::RoomReserved { .. }
            | ServerResponse::CreateFailed { .. } => Vec::new(),
        }
    }

    /// Turns the given slots face-down again unless they were matched meanwhile.
    pub fn hide_temporary(&mut self, indices: &[usize]) {
        for index in indices {
            if !self.is_revealed(*index) {
                self.faces.remove(index);
                self.temp.retain(|slot| slot != index);
            }
        }
    }

    /// The first player with our name. Names are the only identity the
    /// server exposes to clients.
    pub fn my_seat(&self) -> Option<usize> {
        self.players
            .iter()
            .position(|player| player.name == self.my_name)
    }

    pub fn click(&self, index: usize) -> Result<ClientMessage, ClickRejected> {
        let current_turn = self.current_turn.ok_or(ClickRejected::WaitingForSync)?;
        if self.my_seat() != Some(current_turn) {
            return Err(ClickRejected::NotYourTurn);
        }
        Ok(ClientMessage::FlipCard {
            room: self.room.clone(),
            index: index as i64,
        })
    }

    pub fn start(&self) -> ClientMessage {
        ClientMessage::StartGame {
            room: self.room.clone(),
        }
    }

    pub fn leave(&self) -> ClientMessage {
        ClientMessage::LeaveRoom {
            room: self.room.clone(),
        }
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    fn mark_revealed(&mut self, index: usize) {
        if self.revealed.len() <= index {
            self.revealed.resize(self.card_count.max(index + 1), false);
        }
        self.revealed[index] = true;
        self.faces.remove(&index);
    }

    pub fn tiles(&self) -> Vec<Tile> {
        (0..self.card_count)
            .map(|index| {
                if self.is_revealed(index) {
                    Tile::Matched
                } else if let Some(value) = self.faces.get(&index) {
                    Tile::FaceUp(value.clone())
                } else if self.temp.contains(&index) {
                    Tile::Pending
                } else {
                    Tile::FaceDown
                }
            })
            .collect()
    }

    pub fn player_lines(&self) -> Vec<PlayerLine> {
        self.players
            .iter()
            .enumerate()
            .map(|(seat, player)| PlayerLine {
                name: player.name.clone(),
                score: player.score,
                active: self.current_turn == Some(seat),
            })
            .collect()
    }

    pub fn turn_info(&self) -> String {
        match self.current_turn {
            None => "Waiting...".to_string(),
            Some(seat) => {
                let name = self
                    .players
                    .get(seat)
                    .map(|player| player.name.as_str())
                    .unwrap_or("—");
                format!("Current turn: {}", name)
            }
        }
    }

    pub fn winners(&self) -> Vec<&PlayerScore> {
        let Some(best) = self.players.iter().map(|player| player.score).max() else {
            return Vec::new();
        };
        self.players
            .iter()
            .filter(|player| player.score == best)
            .collect()
    }

    fn game_over_message(&self) -> String {
        match self.winners().as_slice() {
            [] => "Game over!".to_string(),
            [winner] => format!(
                "Game over! Winner: {} ({} points)",
                winner.name, winner.score
            ),
            tied => {
                let names: Vec<&str> = tied.iter().map(|player| player.name.as_str()).collect();
                format!("Game over! Tie: {} ({} points)", names.join(", "), tied[0].score)
            }
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tile::Matched => write!(f, "✔"),
            Tile::FaceUp(value) => write!(f, "{}", value),
            Tile::Pending => write!(f, "?"),
            Tile::FaceDown => write!(f, "·"),
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Room {}", self.room)?;
        if self.card_count == 0 {
            return writeln!(f, "Waiting for host to start the game...");
        }
        writeln!(f, "{}", self.turn_info())?;

        for (row, tiles) in self.tiles().chunks(TILES_PER_ROW).enumerate() {
            for (column, tile) in tiles.iter().enumerate() {
                write!(f, "{:>3} [{}] ", row * TILES_PER_ROW + column, tile)?;
            }
            writeln!(f)?;
        }

        for line in self.player_lines() {
            let marker = if line.active { ">" } else { " " };
            writeln!(f, "{} {} — {}", marker, line.name, line.score)?;
        }
        Ok(())
    }
}
