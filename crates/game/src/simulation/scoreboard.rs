use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoreboard {
    pub rounds: u32,
    pub wins: u32,
    pub losses: u32,
    scores: BTreeMap<String, u32>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, player_name: &str, winner: &str) -> bool {
        self.rounds += 1;
        let won = winner == player_name;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        *self.scores.entry(winner.to_string()).or_default() += 1;
        won
    }

    pub fn score(&self, player_name: &str) -> u32 {
        self.scores.get(player_name).copied().unwrap_or(0)
    }

    pub fn scores(&self) -> impl Iterator<Item = (&str, u32)> {
        self.scores.iter().map(|(name, score)| (name.as_str(), *score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_wins_losses_and_scores() {
        let mut board = Scoreboard::new();
        assert!(board.record("bot", "bot"));
        assert!(!board.record("bot", "rival"));
        assert!(board.record("bot", "bot"));

        assert_eq!(board.rounds, 3);
        assert_eq!(board.wins, 2);
        assert_eq!(board.losses, 1);
        assert_eq!(board.score("bot"), 2);
        assert_eq!(board.score("rival"), 1);
        assert_eq!(board.score("nobody"), 0);

        let scores: Vec<_> = board.scores().collect();
        assert_eq!(scores, vec![("bot", 2), ("rival", 1)]);
    }
}
