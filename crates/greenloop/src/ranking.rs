//! Family standings board.
//!
//! Pure functions over a snapshot of profiles; nothing here touches the
//! store. The shell loads the members, this module ranks them.

use crate::profile::Profile;
use serde::Serialize;

/// Podium medal for the top three point totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    fn for_position(position: usize) -> Option<Medal> {
        match position {
            0 => Some(Medal::Gold),
            1 => Some(Medal::Silver),
            2 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// One member's place on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberStanding {
    pub profile: Profile,
    pub medal: Option<Medal>,
}

/// Goals the family unlocks together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    EveryonePlayed,
    FamilyHundred,
    FamilyFiveHundred,
    EveryoneTenPlays,
}

impl AchievementKind {
    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::EveryonePlayed => "Everyone joined in",
            AchievementKind::FamilyHundred => "100 family points",
            AchievementKind::FamilyFiveHundred => "500 family points",
            AchievementKind::EveryoneTenPlays => "Ten rounds each",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub unlocked: bool,
}

/// The computed board: ranked members, family totals, achievements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    /// Members in descending point order; ties keep their input order.
    pub members: Vec<MemberStanding>,
    pub family_points: u64,
    pub average_points: f64,
    pub achievements: Vec<Achievement>,
}

/// Rank a snapshot of the family.
pub fn standings(profiles: &[Profile]) -> Standings {
    let mut sorted = profiles.to_vec();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));

    let family_points: u64 = sorted.iter().map(|p| p.points).sum();
    let average_points = if sorted.is_empty() {
        0.0
    } else {
        family_points as f64 / sorted.len() as f64
    };
    let members = sorted
        .into_iter()
        .enumerate()
        .map(|(position, profile)| MemberStanding {
            medal: Medal::for_position(position),
            profile,
        })
        .collect();

    Standings {
        members,
        family_points,
        average_points,
        achievements: achievements(profiles, family_points),
    }
}

/// Achievement states for a snapshot. An empty family unlocks nothing.
pub fn achievements(profiles: &[Profile], family_points: u64) -> Vec<Achievement> {
    let any = !profiles.is_empty();
    vec![
        Achievement {
            kind: AchievementKind::EveryonePlayed,
            unlocked: any && profiles.iter().all(|p| p.plays >= 1),
        },
        Achievement {
            kind: AchievementKind::FamilyHundred,
            unlocked: family_points >= 100,
        },
        Achievement {
            kind: AchievementKind::FamilyFiveHundred,
            unlocked: family_points >= 500,
        },
        Achievement {
            kind: AchievementKind::EveryoneTenPlays,
            unlocked: any && profiles.iter().all(|p| p.plays >= 10),
        },
    ]
}
