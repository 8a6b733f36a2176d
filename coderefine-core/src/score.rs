/// Colour tier for a 0-100 quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    /// `score >= 80`
    Pass,
    /// `60 <= score < 80`
    Warn,
    /// `score < 60`
    Fail,
}

impl ScoreTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => ScoreTier::Pass,
            60..=79 => ScoreTier::Warn,
            _ => ScoreTier::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(ScoreTier::for_score(85), ScoreTier::Pass);
        assert_eq!(ScoreTier::for_score(80), ScoreTier::Pass);
        assert_eq!(ScoreTier::for_score(79), ScoreTier::Warn);
        assert_eq!(ScoreTier::for_score(70), ScoreTier::Warn);
        assert_eq!(ScoreTier::for_score(60), ScoreTier::Warn);
        assert_eq!(ScoreTier::for_score(59), ScoreTier::Fail);
        assert_eq!(ScoreTier::for_score(45), ScoreTier::Fail);
        assert_eq!(ScoreTier::for_score(0), ScoreTier::Fail);
    }
}
