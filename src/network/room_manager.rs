use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::errors::validation::normalize_player_name;
use crate::game::room::{ClaimOutcome, FlipReport, RemovedPlayer};
use crate::game::room_code::{generate_room_code, normalize_room_code};
use crate::{AppError, AppResult, Board, GameSettings, Room};

pub const DEFAULT_HOST_NAME: &str = "Host";
pub const DEFAULT_PLAYER_NAME: &str = "Player";
const MAX_CODE_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub room: String,
    pub newly_joined: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub room: String,
    pub removed: RemovedPlayer,
    pub room_closed: bool,
}

pub struct RoomManager {
    rooms: HashMap<String, Room>,
    connection_rooms: HashMap<String, HashSet<String>>, // connection_id -> room codes
    settings: GameSettings,
    rng: StdRng,
}

impl RoomManager {
    pub fn new(settings: GameSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    pub fn with_rng(settings: GameSettings, rng: StdRng) -> Self {
        Self {
            rooms: HashMap::new(),
            connection_rooms: HashMap::new(),
            settings,
            rng,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Gives up after `MAX_CODE_ATTEMPTS` collisions.
    fn fresh_code(&mut self) -> AppResult<String> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_room_code(self.settings.code_length, &mut self.rng);
            if !self.rooms.contains_key(&code) {
                return Ok(code);
            }
        }
        tracing::warn!(rooms = self.rooms.len(), "no free room code found");
        Err(AppError::RoomCodesExhausted)
    }

    fn fresh_board(&mut self) -> Board {
        Board::new(self.settings.pair_count, &mut self.rng)
    }

    fn index_connection(&mut self, connection_id: &str, room: &str) {
        self.connection_rooms
            .entry(connection_id.to_string())
            .or_default()
            .insert(room.to_string());
    }

    fn unindex_connection(&mut self, connection_id: &str, room: &str) {
        if let Some(rooms) = self.connection_rooms.get_mut(connection_id) {
            rooms.remove(room);
            if rooms.is_empty() {
                self.connection_rooms.remove(connection_id);
            }
        }
    }

    /// Opens a hostless room; the first `create_room` for its code claims it.
    pub fn reserve_room(&mut self) -> AppResult<String> {
        let code = self.fresh_code()?;
        let board = self.fresh_board();
        self.rooms.insert(code.clone(), Room::new(code.clone(), board));
        tracing::info!(room = %code, "room reserved");
        Ok(code)
    }

    /// Drops a reserved room that nobody claimed or joined.
    pub fn expire_reservation(&mut self, room: &str) -> bool {
        let unclaimed = self
            .rooms
            .get(room)
            .is_some_and(|existing| existing.host().is_none() && existing.is_empty());
        if unclaimed {
            self.close_room(room);
            tracing::info!(%room, "unclaimed reservation expired");
        }
        unclaimed
    }

    /// Adds a prepared room, indexing every seated connection.
    pub fn insert_room(&mut self, room: Room) {
        let code = room.code().to_string();
        for connection_id in room.connection_ids() {
            self.index_connection(&connection_id, &code);
        }
        self.rooms.insert(code, room);
    }

    pub fn create_room(
        &mut self,
        connection_id: &str,
        room: Option<&str>,
        name: Option<&str>,
    ) -> AppResult<String> {
        let name = normalize_player_name(name, DEFAULT_HOST_NAME)?;
        let code = match room.and_then(normalize_room_code) {
            Some(code) => code,
            None => self.fresh_code()?,
        };

        match self.rooms.get_mut(&code) {
            None => {
                let board = self.fresh_board();
                let new_room = Room::with_host(code.clone(), board, connection_id, &name);
                self.rooms.insert(code.clone(), new_room);
                tracing::info!(room = %code, host = %name, "room created");
            }
            Some(existing) => {
                if existing.claim_host(connection_id, &name)? == ClaimOutcome::Claimed {
                    tracing::info!(room = %code, host = %name, "host claimed room");
                }
            }
        }

        self.index_connection(connection_id, &code);
        Ok(code)
    }

    pub fn join_room(
        &mut self,
        connection_id: &str,
        room: &str,
        name: Option<&str>,
    ) -> AppResult<JoinOutcome> {
        let name = normalize_player_name(name, DEFAULT_PLAYER_NAME)?;
        let code = normalize_room_code(room).unwrap_or_default();
        let existing = self
            .rooms
            .get_mut(&code)
            .ok_or_else(|| AppError::RoomDoesNotExist { room: code.clone() })?;

        let newly_joined = existing.add_player(connection_id, &name);
        if newly_joined {
            tracing::info!(room = %code, player = %name, "player joined");
        }
        self.index_connection(connection_id, &code);

        Ok(JoinOutcome {
            room: code,
            newly_joined,
        })
    }

    pub fn start_game(&mut self, connection_id: &str, room: &str) -> AppResult<String> {
        let code = normalize_room_code(room).unwrap_or_default();
        let existing = self.room_mut(&code)?;
        existing.start(connection_id)?;
        tracing::info!(room = %code, players = existing.player_count(), "game started");
        Ok(code)
    }

    pub fn flip_card(
        &mut self,
        connection_id: &str,
        room: &str,
        index: i64,
    ) -> AppResult<(String, FlipReport)> {
        let code = normalize_room_code(room).unwrap_or_default();
        let report = self.room_mut(&code)?.flip_card(connection_id, index)?;
        Ok((code, report))
    }

    /// True when the mismatch was still current and the turn moved on.
    pub fn resolve_mismatch(&mut self, room: &str, round: u64) -> bool {
        self.rooms
            .get_mut(room)
            .map(|existing| existing.resolve_mismatch(round))
            .unwrap_or(false)
    }

    /// Leaving a room the connection is not part of is a no-op.
    pub fn leave_room(&mut self, connection_id: &str, room: &str) -> Option<LeaveOutcome> {
        let code = normalize_room_code(room)?;
        let existing = self.rooms.get_mut(&code)?;
        let removed = existing.remove_player(connection_id)?;
        let room_closed = existing.is_empty();

        self.unindex_connection(connection_id, &code);
        if room_closed {
            self.close_room(&code);
        }
        tracing::info!(room = %code, player = %removed.player.name, room_closed, "player left");

        Some(LeaveOutcome {
            room: code,
            removed,
            room_closed,
        })
    }

    pub fn disconnect(&mut self, connection_id: &str) -> Vec<LeaveOutcome> {
        self.get_rooms_from_connection_id(connection_id)
            .iter()
            .filter_map(|room| self.leave_room(connection_id, room))
            .collect()
    }

    /// Drops the room and every index entry pointing at it.
    pub fn close_room(&mut self, room: &str) -> Option<Room> {
        let closed = self.rooms.remove(room)?;
        for connection_id in closed.connection_ids() {
            self.unindex_connection(&connection_id, room);
        }
        Some(closed)
    }

    pub fn room(&self, room: &str) -> Option<&Room> {
        self.rooms.get(room)
    }

    fn room_mut(&mut self, room: &str) -> AppResult<&mut Room> {
        self.rooms.get_mut(room).ok_or_else(|| AppError::RoomNotFound {
            room: room.to_string(),
        })
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn get_connections_id_from_room_id(&self, room: &str) -> Vec<String> {
        self.rooms
            .get(room)
            .map(Room::connection_ids)
            .unwrap_or_default()
    }

    pub fn get_rooms_from_connection_id(&self, connection_id: &str) -> Vec<String> {
        let mut rooms: Vec<String> = self
            .connection_rooms
            .get(connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }
}
