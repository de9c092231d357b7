use serde::{Deserialize, Serialize};

/// Display color attached to a team (normalized RGB).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl TeamColor {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Immutable team identity. Constructed at selection time, read-only after;
/// the session only ever uses it as a label on results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub country: String,
    pub primary_color: TeamColor,
    pub secondary_color: TeamColor,
    /// World ranking, 1 = best
    pub ranking: u32,
}

impl Team {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        primary_color: TeamColor,
        secondary_color: TeamColor,
        ranking: u32,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            primary_color,
            secondary_color,
            ranking: ranking.max(1),
        }
    }

    /// The built-in selection roster.
    pub fn default_catalog() -> Vec<Team> {
        vec![
            Team::new("France", "France", TeamColor::new(0.0, 0.2, 0.6), TeamColor::WHITE, 1),
            Team::new(
                "Brazil",
                "Brazil",
                TeamColor::new(1.0, 0.8, 0.0),
                TeamColor::new(0.0, 0.4, 0.0),
                2,
            ),
            Team::new("Germany", "Germany", TeamColor::BLACK, TeamColor::WHITE, 3),
            Team::new(
                "Spain",
                "Spain",
                TeamColor::new(0.8, 0.0, 0.0),
                TeamColor::new(1.0, 0.8, 0.0),
                4,
            ),
            Team::new("Italy", "Italy", TeamColor::new(0.0, 0.3, 0.6), TeamColor::WHITE, 5),
            Team::new(
                "Argentina",
                "Argentina",
                TeamColor::new(0.4, 0.7, 1.0),
                TeamColor::WHITE,
                6,
            ),
            Team::new(
                "England",
                "England",
                TeamColor::WHITE,
                TeamColor::new(0.8, 0.0, 0.0),
                7,
            ),
            Team::new(
                "Portugal",
                "Portugal",
                TeamColor::new(0.0, 0.4, 0.0),
                TeamColor::new(0.8, 0.0, 0.0),
                8,
            ),
            Team::new(
                "Morocco",
                "Morocco",
                TeamColor::new(0.8, 0.0, 0.0),
                TeamColor::new(0.0, 0.5, 0.0),
                9,
            ),
            Team::new(
                "Algeria",
                "Algeria",
                TeamColor::new(0.0, 0.6, 0.3),
                TeamColor::WHITE,
                10,
            ),
            Team::new(
                "Tunisia",
                "Tunisia",
                TeamColor::new(0.9, 0.1, 0.1),
                TeamColor::WHITE,
                11,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_unique_rankings() {
        let catalog = Team::default_catalog();
        assert_eq!(catalog.len(), 11);

        let mut rankings: Vec<u32> = catalog.iter().map(|t| t.ranking).collect();
        rankings.sort_unstable();
        rankings.dedup();
        assert_eq!(rankings.len(), 11);
    }

    #[test]
    fn test_ranking_floor() {
        let team = Team::new("X", "X", TeamColor::WHITE, TeamColor::BLACK, 0);
        assert_eq!(team.ranking, 1);
    }
}
