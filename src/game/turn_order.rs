#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOrder {
    current: usize,
}

impl TurnOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_player_turn(&self, seat: usize) -> bool {
        self.current == seat
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn advance_turn(&mut self, player_count: usize) -> usize {
        self.current = (self.current + 1) % player_count.max(1);
        self.current
    }

    /// Keeps the active player stable after the seat at `removed` is gone.
    pub fn player_removed(&mut self, removed: usize, remaining: usize) {
        if removed < self.current {
            self.current -= 1;
        }
        if self.current >= remaining {
            self.current = 0;
        }
    }
}
