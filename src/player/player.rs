use crate::network::messages::{PlayerName, PlayerScore};

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub connection_id: String,
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(connection_id: &str, name: &str) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            name: name.to_string(),
            score: 0,
        }
    }

    pub fn award_pair(&mut self) {
        self.score += 1;
    }

    pub fn summary(&self) -> PlayerName {
        PlayerName {
            name: self.name.clone(),
        }
    }

    pub fn scoreline(&self) -> PlayerScore {
        PlayerScore {
            name: self.name.clone(),
            score: self.score,
        }
    }
}
