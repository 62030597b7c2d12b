use std::time::Duration;

use clap::Parser;

use crate::{AppError, AppResult};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5000";
pub const DEFAULT_PAIR_COUNT: usize = 8;
pub const MAX_PAIR_COUNT: usize = 26;
pub const DEFAULT_MISMATCH_DELAY_MS: u64 = 1000;
pub const DEFAULT_ROOM_CODE_LENGTH: usize = 6;
pub const MIN_ROOM_CODE_LENGTH: usize = 4;
pub const DEFAULT_RESERVATION_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Parser)]
#[command(name = "server", about = "Multiplayer memory matching game server")]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to
    #[arg(long, env = "MEMORY_MATCH_BIND", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    /// Number of card pairs on a fresh board
    #[arg(long, env = "MEMORY_MATCH_PAIRS", default_value_t = DEFAULT_PAIR_COUNT)]
    pub pairs: usize,

    /// How long a mismatched pair stays face-up before the turn passes
    #[arg(long, env = "MEMORY_MATCH_MISMATCH_DELAY_MS", default_value_t = DEFAULT_MISMATCH_DELAY_MS)]
    pub mismatch_delay_ms: u64,

    /// Length of generated room codes
    #[arg(long, env = "MEMORY_MATCH_CODE_LENGTH", default_value_t = DEFAULT_ROOM_CODE_LENGTH)]
    pub code_length: usize,

    /// Seconds a reserved room may stay unclaimed before it is dropped
    #[arg(long, env = "MEMORY_MATCH_RESERVATION_TTL_SECS", default_value_t = DEFAULT_RESERVATION_TTL_SECS)]
    pub reservation_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDRESS.to_string(),
            pairs: DEFAULT_PAIR_COUNT,
            mismatch_delay_ms: DEFAULT_MISMATCH_DELAY_MS,
            code_length: DEFAULT_ROOM_CODE_LENGTH,
            reservation_ttl_secs: DEFAULT_RESERVATION_TTL_SECS,
        }
    }
}

impl ServerConfig {
    pub fn game_settings(&self) -> AppResult<GameSettings> {
        if self.pairs == 0 || self.pairs > MAX_PAIR_COUNT {
            return Err(AppError::InvalidConfig {
                reason: format!("pairs must be between 1 and {}", MAX_PAIR_COUNT),
            });
        }
        if self.code_length < MIN_ROOM_CODE_LENGTH {
            return Err(AppError::InvalidConfig {
                reason: format!("code length must be at least {}", MIN_ROOM_CODE_LENGTH),
            });
        }
        Ok(GameSettings {
            pair_count: self.pairs,
            mismatch_delay: Duration::from_millis(self.mismatch_delay_ms),
            code_length: self.code_length,
            reservation_ttl: Duration::from_secs(self.reservation_ttl_secs),
        })
    }
}

/// Validated game parameters handed to the lobby.
#[derive(Debug, Clone)]
pub struct GameSettings {
    pub pair_count: usize,
    pub mismatch_delay: Duration,
    pub code_length: usize,
    pub reservation_ttl: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            pair_count: DEFAULT_PAIR_COUNT,
            mismatch_delay: Duration::from_millis(DEFAULT_MISMATCH_DELAY_MS),
            code_length: DEFAULT_ROOM_CODE_LENGTH,
            reservation_ttl: Duration::from_secs(DEFAULT_RESERVATION_TTL_SECS),
        }
    }
}
