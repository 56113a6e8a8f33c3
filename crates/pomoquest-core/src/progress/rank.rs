use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named tier derived from cumulative points.
///
/// Variants are declared in threshold order, so the derived `Ord` matches
/// the rank table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Rank {
    #[default]
    TimeNovice,
    FocusApprentice,
    ProductivityPro,
    EfficiencyExpert,
    TimeMaster,
    PomodoroVirtuoso,
}

impl Rank {
    /// The rank table, ascending by threshold.
    pub const TABLE: [(Rank, u32); 6] = [
        (Rank::TimeNovice, 0),
        (Rank::FocusApprentice, 100),
        (Rank::ProductivityPro, 500),
        (Rank::EfficiencyExpert, 1000),
        (Rank::TimeMaster, 2500),
        (Rank::PomodoroVirtuoso, 5000),
    ];

    /// Last rank in the table whose threshold is at or below `points`.
    pub fn for_points(points: u32) -> Rank {
        Self::TABLE
            .iter()
            .take_while(|(_, min)| points >= *min)
            .last()
            .map(|(rank, _)| *rank)
            .unwrap_or_default()
    }

    pub fn min_points(self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(rank, _)| *rank == self)
            .map(|(_, min)| *min)
            .unwrap_or(0)
    }

    /// The next rank up and its threshold, or `None` at the top of the table.
    pub fn next(self) -> Option<(Rank, u32)> {
        Self::TABLE.iter().copied().find(|(rank, _)| *rank > self)
    }

    pub fn name(self) -> &'static str {
        match self {
            Rank::TimeNovice => "Time Novice",
            Rank::FocusApprentice => "Focus Apprentice",
            Rank::ProductivityPro => "Productivity Pro",
            Rank::EfficiencyExpert => "Efficiency Expert",
            Rank::TimeMaster => "Time Master",
            Rank::PomodoroVirtuoso => "Pomodoro Virtuoso",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABLE
            .iter()
            .map(|(rank, _)| *rank)
            .find(|rank| rank.name() == s)
            .ok_or_else(|| format!("unknown rank: {s}"))
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.name().to_string()
    }
}

impl TryFrom<String> for Rank {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
