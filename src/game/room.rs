use crate::game::board::{Board, FlipOutcome};
use crate::network::messages::{PlayerScore, ServerResponse};
use crate::{AppError, AppResult, Player, TurnOrder};

#[derive(Debug, Clone)]
pub struct Room {
    code: String,
    host: Option<String>, // connection_id of the host
    players: Vec<Player>, // join order is seat order
    board: Board,
    turn: TurnOrder,
    started: bool,
    mismatch_round: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClaimOutcome {
    Claimed,
    AlreadyHost,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairState {
    Open,
    Matched { indices: [usize; 2], complete: bool },
    Mismatched { indices: [usize; 2], round: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlipReport {
    pub seat: usize,
    pub index: usize,
    pub value: String,
    pub pair: PairState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovedPlayer {
    pub player: Player,
    pub new_host: Option<String>,
}

impl Room {
    /// A room nobody has claimed yet.
    pub fn new(code: String, board: Board) -> Self {
        Self {
            code,
            host: None,
            players: Vec::new(),
            board,
            turn: TurnOrder::new(),
            started: false,
            mismatch_round: 0,
        }
    }

    pub fn with_host(code: String, board: Board, connection_id: &str, name: &str) -> Self {
        let mut room = Self::new(code, board);
        room.host = Some(connection_id.to_string());
        room.players.push(Player::new(connection_id, name));
        room
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn host_name(&self) -> Option<String> {
        let host = self.host.as_deref()?;
        self.players
            .iter()
            .find(|player| player.connection_id == host)
            .map(|player| player.name.clone())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current_turn(&self) -> usize {
        self.turn.current()
    }

    pub fn mismatch_round(&self) -> u64 {
        self.mismatch_round
    }

    pub fn seat_of(&self, connection_id: &str) -> Option<usize> {
        self.players
            .iter()
            .position(|player| player.connection_id == connection_id)
    }

    pub fn has_player(&self, connection_id: &str) -> bool {
        self.seat_of(connection_id).is_some()
    }

    pub fn connection_ids(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|player| player.connection_id.clone())
            .collect()
    }

    pub fn claim_host(&mut self, connection_id: &str, name: &str) -> AppResult<ClaimOutcome> {
        match self.host.as_deref() {
            Some(host) if host == connection_id => Ok(ClaimOutcome::AlreadyHost),
            Some(_) => Err(AppError::RoomHasHost {
                room: self.code.clone(),
            }),
            None => {
                self.host = Some(connection_id.to_string());
                if !self.has_player(connection_id) {
                    self.players.insert(0, Player::new(connection_id, name));
                }
                Ok(ClaimOutcome::Claimed)
            }
        }
    }

    /// Returns false when the connection was already seated.
    pub fn add_player(&mut self, connection_id: &str, name: &str) -> bool {
        if self.has_player(connection_id) {
            return false;
        }
        self.players.push(Player::new(connection_id, name));
        true
    }

    pub fn remove_player(&mut self, connection_id: &str) -> Option<RemovedPlayer> {
        let seat = self.seat_of(connection_id)?;
        let player = self.players.remove(seat);

        if self.started && seat == self.turn.current() && !self.board.temp_flips().is_empty() {
            self.board.hide_mismatch();
            self.mismatch_round += 1;
        }
        self.turn.player_removed(seat, self.players.len());

        let mut new_host = None;
        if self.host.as_deref() == Some(connection_id) {
            self.host = self.players.first().map(|p| p.connection_id.clone());
            new_host = self.host_name();
        }

        Some(RemovedPlayer { player, new_host })
    }

    pub fn start(&mut self, connection_id: &str) -> AppResult<()> {
        if self.host.as_deref() != Some(connection_id) {
            return Err(AppError::NotHost);
        }
        self.started = true;
        self.turn.reset();
        Ok(())
    }

    pub fn flip_card(&mut self, connection_id: &str, index: i64) -> AppResult<FlipReport> {
        if !self.started {
            return Err(AppError::GameNotStarted);
        }
        let seat = self.seat_of(connection_id).ok_or(AppError::NotInRoom)?;
        if !self.turn.is_player_turn(seat) {
            return Err(AppError::NotPlayerTurn);
        }

        let (value, indices, matched) = match self.board.flip(index)? {
            FlipOutcome::First { value } => {
                let slot = self.board.temp_flips()[0];
                return Ok(FlipReport {
                    seat,
                    index: slot,
                    value,
                    pair: PairState::Open,
                });
            }
            FlipOutcome::Pair {
                value,
                indices,
                matched,
            } => (value, indices, matched),
        };

        let pair = if matched {
            self.players[seat].award_pair();
            PairState::Matched {
                indices,
                complete: self.board.is_complete(),
            }
        } else {
            self.mismatch_round += 1;
            PairState::Mismatched {
                indices,
                round: self.mismatch_round,
            }
        };

        Ok(FlipReport {
            seat,
            index: indices[1],
            value,
            pair,
        })
    }

    /// Flips a mismatched pair back and passes the turn. Stale rounds are ignored.
    pub fn resolve_mismatch(&mut self, round: u64) -> bool {
        if round != self.mismatch_round || !self.board.has_pending_mismatch() {
            return false;
        }
        self.board.hide_mismatch();
        self.turn.advance_turn(self.players.len());
        true
    }

    pub fn scoreboard(&self) -> Vec<PlayerScore> {
        self.players.iter().map(Player::scoreline).collect()
    }

    pub fn lobby_update(&self) -> ServerResponse {
        ServerResponse::LobbyUpdate {
            room: self.code.clone(),
            players: self.players.iter().map(Player::summary).collect(),
            host: self.host_name(),
            started: self.started,
        }
    }

    pub fn game_started(&self) -> ServerResponse {
        ServerResponse::GameStarted {
            card_count: self.board.len(),
            players: self.scoreboard(),
            current_turn: self.turn.current(),
        }
    }

    pub fn board_state(&self) -> ServerResponse {
        ServerResponse::BoardState {
            revealed: self.board.revealed().to_vec(),
            temp: self.board.temp_flips().to_vec(),
            players: self.scoreboard(),
            current_turn: self.turn.current(),
        }
    }

    pub fn game_over(&self) -> ServerResponse {
        ServerResponse::GameOver {
            players: self.scoreboard(),
        }
    }
}
