use std::time::Duration;

use tokio::sync::mpsc;

use crate::game::room::{FlipReport, PairState};
use crate::network::messages::{serialize_response, ClientMessage, ServerResponse};
use crate::network::room_manager::LeaveOutcome;
use crate::{AppError, AppResult, ConnectionCommand, RoomManager};

#[derive(Debug)]
pub enum LobbyMessage {
    Client {
        connection_id: String,
        message: ClientMessage,
    },
    Disconnect {
        connection_id: String,
    },
    ResolveMismatch {
        room: String,
        round: u64,
    },
    ExpireReservation {
        room: String,
    },
}

/// Single owner of every room. Messages are handled one at a time.
pub struct LobbyActor {
    room_manager: RoomManager,
    cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
    timer_sender: mpsc::WeakUnboundedSender<LobbyMessage>,
}

impl LobbyActor {
    pub fn new(
        room_manager: RoomManager,
        cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
        timer_sender: mpsc::WeakUnboundedSender<LobbyMessage>,
    ) -> Self {
        Self {
            room_manager,
            cmd_sender,
            timer_sender,
        }
    }

    pub fn room_manager(&self) -> &RoomManager {
        &self.room_manager
    }

    pub async fn run(&mut self, mut receiver: mpsc::UnboundedReceiver<LobbyMessage>) {
        tracing::info!("🏛️ lobby actor started");

        while let Some(message) = receiver.recv().await {
            if let Err(error) = self.handle_message(message) {
                tracing::error!(%error, "lobby actor error");
                if matches!(error, AppError::Internal { .. }) {
                    break;
                }
            }
        }

        tracing::info!("🏛️ lobby actor stopped");
    }

    pub fn handle_message(&mut self, message: LobbyMessage) -> AppResult<()> {
        match message {
            LobbyMessage::Client {
                connection_id,
                message,
            } => {
                tracing::debug!(%connection_id, ?message, "handling client message");
                if let Err(error) = self.handle_client_message(&connection_id, message) {
                    if error.should_log() {
                        return Err(error);
                    }
                    tracing::debug!(
                        %connection_id,
                        error = error.variant_name(),
                        "request rejected"
                    );
                    self.send_to_player(&connection_id, ServerResponse::from_app_error(&error))?;
                }
            }
            LobbyMessage::Disconnect { connection_id } => {
                for outcome in self.room_manager.disconnect(&connection_id) {
                    self.announce_departure(outcome)?;
                }
            }
            LobbyMessage::ResolveMismatch { room, round } => {
                if self.room_manager.resolve_mismatch(&room, round) {
                    self.broadcast_state(&room)?;
                }
            }
            LobbyMessage::ExpireReservation { room } => {
                self.room_manager.expire_reservation(&room);
            }
        }
        Ok(())
    }

    fn handle_client_message(
        &mut self,
        connection_id: &str,
        message: ClientMessage,
    ) -> AppResult<()> {
        match message {
            ClientMessage::Ping => {
                self.send_to_player(connection_id, ServerResponse::Pong)?;
            }

            ClientMessage::ReserveRoom => {
                let room = self.room_manager.reserve_room()?;
                self.send_to_player(
                    connection_id,
                    ServerResponse::RoomReserved { room: room.clone() },
                )?;
                let ttl = self.room_manager.settings().reservation_ttl;
                self.schedule(LobbyMessage::ExpireReservation { room }, ttl);
            }

            ClientMessage::CreateRoom { room, name } => {
                let room = self.room_manager.create_room(
                    connection_id,
                    room.as_deref(),
                    name.as_deref(),
                )?;
                self.send_to_player(
                    connection_id,
                    ServerResponse::RoomCreated { room: room.clone() },
                )?;
                self.broadcast_lobby(&room)?;
            }

            ClientMessage::JoinRoom { room, name } => {
                let outcome = self
                    .room_manager
                    .join_room(connection_id, &room, name.as_deref())?;
                self.send_to_player(
                    connection_id,
                    ServerResponse::JoinOk {
                        room: outcome.room.clone(),
                    },
                )?;
                if outcome.newly_joined {
                    self.broadcast_lobby(&outcome.room)?;
                    self.catch_up_late_joiner(connection_id, &outcome.room)?;
                }
            }

            ClientMessage::StartGame { room } => {
                let room = self.room_manager.start_game(connection_id, &room)?;
                if let Some(started) = self.room_manager.room(&room) {
                    let game_started = started.game_started();
                    let board_state = started.board_state();
                    self.broadcast(&room, game_started)?;
                    self.broadcast(&room, board_state)?;
                }
            }

            ClientMessage::FlipCard { room, index } => {
                let (room, report) = self
                    .room_manager
                    .flip_card(connection_id, &room, index)?;
                self.announce_flip(&room, report)?;
            }

            ClientMessage::LeaveRoom { room } => {
                if let Some(outcome) = self.room_manager.leave_room(connection_id, &room) {
                    self.announce_departure(outcome)?;
                }
            }
        }
        Ok(())
    }

    fn announce_flip(&mut self, room: &str, report: FlipReport) -> AppResult<()> {
        let FlipReport {
            seat,
            index,
            value,
            pair,
        } = report;
        self.broadcast(room, ServerResponse::CardFlipped { index, value })?;

        match pair {
            PairState::Open => {}
            PairState::Matched { indices, complete } => {
                self.broadcast(
                    room,
                    ServerResponse::MatchResult {
                        matched: true,
                        indices,
                        player: seat,
                    },
                )?;
                if complete {
                    if let Some(finished) = self.room_manager.room(room) {
                        self.broadcast(room, finished.game_over())?;
                    }
                    self.room_manager.close_room(room);
                    tracing::info!(%room, "🏆 game over, room closed");
                } else {
                    // Same player goes again.
                    self.broadcast_state(room)?;
                }
            }
            PairState::Mismatched { indices, round } => {
                self.broadcast(
                    room,
                    ServerResponse::MatchResult {
                        matched: false,
                        indices,
                        player: seat,
                    },
                )?;
                let delay = self.room_manager.settings().mismatch_delay;
                self.schedule(
                    LobbyMessage::ResolveMismatch {
                        room: room.to_string(),
                        round,
                    },
                    delay,
                );
            }
        }
        Ok(())
    }

    /// Posts `message` back to this actor after `delay`.
    fn schedule(&self, message: LobbyMessage, delay: Duration) {
        let Some(sender) = self.timer_sender.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(message);
        });
    }

    fn catch_up_late_joiner(&self, connection_id: &str, room: &str) -> AppResult<()> {
        let Some(existing) = self.room_manager.room(room) else {
            return Ok(());
        };
        if existing.is_started() {
            self.send_to_player(connection_id, existing.game_started())?;
            self.send_to_player(connection_id, existing.board_state())?;
        }
        Ok(())
    }

    fn announce_departure(&self, outcome: LeaveOutcome) -> AppResult<()> {
        if let Some(new_host) = &outcome.removed.new_host {
            tracing::info!(room = %outcome.room, %new_host, "host promoted");
        }
        if outcome.room_closed {
            return Ok(());
        }
        let Some(existing) = self.room_manager.room(&outcome.room) else {
            return Ok(());
        };
        if existing.is_started() {
            self.broadcast(&outcome.room, existing.board_state())?;
        }
        self.broadcast(&outcome.room, existing.lobby_update())
    }

    fn broadcast_state(&self, room: &str) -> AppResult<()> {
        if let Some(existing) = self.room_manager.room(room) {
            self.broadcast(room, existing.board_state())?;
            self.broadcast(room, existing.lobby_update())?;
        }
        Ok(())
    }

    fn broadcast_lobby(&self, room: &str) -> AppResult<()> {
        if let Some(existing) = self.room_manager.room(room) {
            self.broadcast(room, existing.lobby_update())?;
        }
        Ok(())
    }

    fn broadcast(&self, room: &str, response: ServerResponse) -> AppResult<()> {
        let connections_id = self.room_manager.get_connections_id_from_room_id(room);
        if connections_id.is_empty() {
            return Ok(());
        }
        self.cmd_sender.send(ConnectionCommand::SendToPlayers {
            connections_id,
            message: serialize_response(response),
        })?;
        Ok(())
    }

    fn send_to_player(&self, connection_id: &str, response: ServerResponse) -> AppResult<()> {
        self.cmd_sender.send(ConnectionCommand::SendToPlayer {
            connection_id: connection_id.to_string(),
            message: serialize_response(response),
        })?;
        Ok(())
    }
}
