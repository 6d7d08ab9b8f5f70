//! Player profiles and where they live in the store.
//!
//! Profiles belong to the backend: the core reads them for the shell and
//! the standings board, and writes only the freshly-created profile of a
//! new member. Finished rounds never rewrite a profile from this side.
//!
//! Key layout: `profile:{family_token}:{player_id}` holds one profile as
//! JSON; the `profile:{family_token}:` prefix covers a whole family.

use crate::error::GameError;
use crate::gateway::KvGateway;
use crate::types::{FamilyToken, PlayerId};
use serde::{Deserialize, Serialize};

/// Key prefix shared by every persisted profile.
pub const PROFILE_KEY_PREFIX: &str = "profile";

/// One family member's stats, as the backend maintains them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: PlayerId,
    pub name: String,
    pub avatar: String,
    /// Lifetime points across all games.
    pub points: u64,
    /// Finished rounds.
    pub plays: u32,
    /// Share of correct moves, in percent.
    pub accuracy_pct: f64,
}

impl Profile {
    /// A brand-new member with zeroed stats.
    pub fn new(id: PlayerId, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            avatar: avatar.into(),
            points: 0,
            plays: 0,
            accuracy_pct: 0.0,
        }
    }
}

/// Storage key for one member's profile.
pub fn profile_key(family: &FamilyToken, player: &PlayerId) -> String {
    format!("{PROFILE_KEY_PREFIX}:{family}:{player}")
}

/// Prefix covering every profile in a family.
pub fn family_prefix(family: &FamilyToken) -> String {
    format!("{PROFILE_KEY_PREFIX}:{family}:")
}

/// Read one member's profile, if it exists.
pub async fn load_profile(
    gateway: &dyn KvGateway,
    family: &FamilyToken,
    player: &PlayerId,
) -> Result<Option<Profile>, GameError> {
    match gateway.get(&profile_key(family, player)).await? {
        Some(value) => {
            let profile = serde_json::from_value(value).map_err(|e| GameError::Persistence {
                reason: format!("failed to decode stored profile for {player}: {e}"),
                source: Some(Box::new(e)),
            })?;
            Ok(Some(profile))
        }
        None => Ok(None),
    }
}

/// Persist one member's profile.
pub async fn save_profile(
    gateway: &dyn KvGateway,
    family: &FamilyToken,
    profile: &Profile,
) -> Result<(), GameError> {
    let value = serde_json::to_value(profile).map_err(|e| GameError::Persistence {
        reason: format!("failed to encode profile for {}: {e}", profile.id),
        source: Some(Box::new(e)),
    })?;
    gateway.set(&profile_key(family, &profile.id), value).await
}

/// Read every profile stored under a family token.
pub async fn load_family(
    gateway: &dyn KvGateway,
    family: &FamilyToken,
) -> Result<Vec<Profile>, GameError> {
    let values = gateway.scan_prefix(&family_prefix(family)).await?;
    let mut members = Vec::with_capacity(values.len());
    for value in values {
        let profile = serde_json::from_value(value).map_err(|e| GameError::Persistence {
            reason: format!("failed to decode a stored profile in family {family}: {e}"),
            source: Some(Box::new(e)),
        })?;
        members.push(profile);
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use serde_json::json;

    fn family() -> FamilyToken {
        FamilyToken::new("fam-1")
    }

    #[test]
    fn key_layout() {
        let key = profile_key(&family(), &PlayerId::new("p-1"));
        assert_eq!(key, "profile:fam-1:p-1");
        assert_eq!(family_prefix(&family()), "profile:fam-1:");
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MemoryKvStore::new();
        let member = Profile::new(PlayerId::new("p-1"), "Ana", "👧");
        save_profile(&store, &family(), &member).await.unwrap();

        let loaded = load_profile(&store, &family(), &member.id).await.unwrap();
        assert_eq!(loaded, Some(member));
    }

    #[tokio::test]
    async fn missing_profile_is_none() {
        let store = MemoryKvStore::new();
        let loaded = load_profile(&store, &family(), &PlayerId::new("ghost"))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn load_family_reads_only_that_family() {
        let store = MemoryKvStore::new();
        let fam_a = FamilyToken::new("fam-a");
        let fam_b = FamilyToken::new("fam-b");
        for (fam, id) in [(&fam_a, "p-1"), (&fam_a, "p-2"), (&fam_b, "p-3")] {
            let member = Profile::new(PlayerId::new(id), format!("member {id}"), "🧑");
            save_profile(&store, fam, &member).await.unwrap();
        }

        let members = load_family(&store, &fam_a).await.unwrap();
        let ids: Vec<&str> = members.iter().map(|p| p.id.as_ref()).collect();
        assert_eq!(ids, vec!["p-1", "p-2"]);
    }

    #[tokio::test]
    async fn undecodable_profile_is_a_persistence_error() {
        let store = MemoryKvStore::new();
        store
            .set("profile:fam-1:p-1", json!({"not": "a profile"}))
            .await
            .unwrap();

        let err = load_profile(&store, &family(), &PlayerId::new("p-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::Persistence { .. }));
    }

    #[test]
    fn new_members_start_zeroed() {
        let member = Profile::new(PlayerId::new("p-9"), "Leo", "👦");
        assert_eq!(member.points, 0);
        assert_eq!(member.plays, 0);
        assert_eq!(member.accuracy_pct, 0.0);
    }
}
