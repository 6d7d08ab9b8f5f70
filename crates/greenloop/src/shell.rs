//! Family login, member switching, and session restore.
//!
//! The shell holds the logged-in family state the host UI works against:
//! which family, which members, who is playing. It never stores the saved
//! session itself; the host persists a [`SavedSession`] across reloads and
//! hands it back to [`FamilyShell::resume`].

use crate::error::GameError;
use crate::gateway::KvGateway;
use crate::profile::{self, Profile};
use crate::session::SessionContext;
use crate::types::{Difficulty, FamilyToken, PlayerId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Avatar glyphs a new member can pick from.
pub const AVATARS: [&str; 12] = [
    "👨", "👩", "👦", "👧", "🧑", "👴", "👵", "🧒", "🧕", "👨‍🦰", "👩‍🦰", "👨‍🦱",
];

/// What the host persists across reloads to restore a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSession {
    pub family: FamilyToken,
    pub player: PlayerId,
}

/// Logged-in family state: the token, the members, the active player.
pub struct FamilyShell {
    gateway: Arc<dyn KvGateway>,
    family: Option<FamilyToken>,
    members: Vec<Profile>,
    active: Option<PlayerId>,
}

impl FamilyShell {
    /// A logged-out shell.
    pub fn new(gateway: Arc<dyn KvGateway>) -> Self {
        Self {
            gateway,
            family: None,
            members: Vec::new(),
            active: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.family.is_some()
    }

    pub fn family(&self) -> Option<&FamilyToken> {
        self.family.as_ref()
    }

    /// Members loaded at login, in store order.
    pub fn members(&self) -> &[Profile] {
        &self.members
    }

    pub fn active_player(&self) -> Option<&PlayerId> {
        self.active.as_ref()
    }

    /// Profile of the active player, if one is selected.
    pub fn active_profile(&self) -> Option<&Profile> {
        let active = self.active.as_ref()?;
        self.members.iter().find(|p| &p.id == active)
    }

    /// Log into a family and select its first member.
    ///
    /// A token with no members is a valid brand-new family; the shell is
    /// logged in with nobody active until a member is added.
    pub async fn login(&mut self, token: FamilyToken) -> Result<(), GameError> {
        let members = profile::load_family(self.gateway.as_ref(), &token).await?;
        tracing::info!(family = %token, members = members.len(), "family logged in");
        self.active = members.first().map(|p| p.id.clone());
        self.members = members;
        self.family = Some(token);
        Ok(())
    }

    /// Restore the session the host persisted.
    ///
    /// A token with no stored members, or a player no longer in the family,
    /// clears local state and returns [`GameError::SessionInvalid`]; the
    /// host should drop its saved session and show the login screen.
    pub async fn resume(&mut self, saved: SavedSession) -> Result<(), GameError> {
        let members = profile::load_family(self.gateway.as_ref(), &saved.family).await?;
        if members.is_empty() {
            self.clear();
            tracing::warn!(family = %saved.family, "resume with unknown family token");
            return Err(GameError::SessionInvalid {
                reason: format!("unknown family token {}", saved.family),
            });
        }
        if !members.iter().any(|p| p.id == saved.player) {
            self.clear();
            tracing::warn!(
                family = %saved.family,
                player = %saved.player,
                "resume with a player no longer in the family"
            );
            return Err(GameError::SessionInvalid {
                reason: format!("player {} is not in family {}", saved.player, saved.family),
            });
        }
        self.members = members;
        self.active = Some(saved.player);
        self.family = Some(saved.family);
        Ok(())
    }

    /// Make another member the active player.
    ///
    /// Re-reads the member's profile so the switch also refreshes stats.
    pub async fn switch_player(&mut self, player: PlayerId) -> Result<(), GameError> {
        let family = self.logged_in_family()?;
        let profile = profile::load_profile(self.gateway.as_ref(), &family, &player).await?;
        if profile.is_none() {
            return Err(GameError::SessionInvalid {
                reason: format!("player {player} is not in family {family}"),
            });
        }
        self.members = profile::load_family(self.gateway.as_ref(), &family).await?;
        self.active = Some(player);
        Ok(())
    }

    /// Create a member with a fresh id and persist their profile.
    ///
    /// The trimmed name must be non-empty. The new member becomes active
    /// when nobody was.
    pub async fn add_member(&mut self, name: &str, avatar: &str) -> Result<PlayerId, GameError> {
        let family = self.logged_in_family()?;
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::Validation {
                reason: "member name must not be blank".to_string(),
            });
        }

        let id = PlayerId::new(Uuid::new_v4().to_string());
        let member = Profile::new(id.clone(), name, avatar);
        profile::save_profile(self.gateway.as_ref(), &family, &member).await?;
        tracing::info!(family = %family, player = %id, name, "member added");

        self.members = profile::load_family(self.gateway.as_ref(), &family).await?;
        if self.active.is_none() {
            self.active = Some(id.clone());
        }
        Ok(id)
    }

    /// Forget the logged-in family. The host clears its own saved session.
    pub fn logout(&mut self) {
        if let Some(family) = &self.family {
            tracing::info!(family = %family, "family logged out");
        }
        self.clear();
    }

    /// Context for starting a game as the active player.
    pub fn session_context(&self, difficulty: Difficulty) -> Result<SessionContext, GameError> {
        let family = self.logged_in_family()?;
        let player = self.active.clone().ok_or_else(|| GameError::SessionInvalid {
            reason: "no active player selected".to_string(),
        })?;
        Ok(SessionContext::new(player, family, difficulty))
    }

    fn logged_in_family(&self) -> Result<FamilyToken, GameError> {
        self.family.clone().ok_or_else(|| GameError::SessionInvalid {
            reason: "no family logged in".to_string(),
        })
    }

    fn clear(&mut self) {
        self.family = None;
        self.members.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::save_profile;
    use crate::storage::MemoryKvStore;

    fn token() -> FamilyToken {
        FamilyToken::new("fam-1")
    }

    async fn seeded_shell(ids: &[&str]) -> (FamilyShell, Arc<MemoryKvStore>) {
        let store = Arc::new(MemoryKvStore::new());
        for id in ids {
            let member = Profile::new(PlayerId::new(*id), format!("member {id}"), "🧒");
            save_profile(store.as_ref(), &token(), &member).await.unwrap();
        }
        (FamilyShell::new(store.clone()), store)
    }

    #[tokio::test]
    async fn login_selects_the_first_member() {
        let (mut shell, _) = seeded_shell(&["p-1", "p-2"]).await;
        shell.login(token()).await.unwrap();

        assert!(shell.is_logged_in());
        assert_eq!(shell.members().len(), 2);
        assert_eq!(shell.active_player(), Some(&PlayerId::new("p-1")));
        assert_eq!(shell.active_profile().unwrap().name, "member p-1");
    }

    #[tokio::test]
    async fn login_into_an_empty_family_is_fine() {
        let (mut shell, _) = seeded_shell(&[]).await;
        shell.login(token()).await.unwrap();

        assert!(shell.is_logged_in());
        assert!(shell.members().is_empty());
        assert!(shell.active_player().is_none());
    }

    #[tokio::test]
    async fn resume_restores_the_saved_player() {
        let (mut shell, _) = seeded_shell(&["p-1", "p-2"]).await;
        shell
            .resume(SavedSession {
                family: token(),
                player: PlayerId::new("p-2"),
            })
            .await
            .unwrap();

        assert_eq!(shell.active_player(), Some(&PlayerId::new("p-2")));
        assert_eq!(shell.members().len(), 2);
    }

    #[tokio::test]
    async fn resume_with_a_stale_token_invalidates() {
        let (mut shell, _) = seeded_shell(&[]).await;
        let err = shell
            .resume(SavedSession {
                family: FamilyToken::new("gone"),
                player: PlayerId::new("p-1"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::SessionInvalid { .. }));
        assert!(!shell.is_logged_in());
        assert!(shell.members().is_empty());
        assert!(shell.active_player().is_none());
    }

    #[tokio::test]
    async fn resume_with_an_unknown_player_invalidates() {
        let (mut shell, _) = seeded_shell(&["p-1"]).await;
        shell.login(token()).await.unwrap();

        let err = shell
            .resume(SavedSession {
                family: token(),
                player: PlayerId::new("ghost"),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, GameError::SessionInvalid { .. }));
        assert!(!shell.is_logged_in());
        assert!(shell.active_player().is_none());
    }

    #[tokio::test]
    async fn switch_player_changes_the_active_member() {
        let (mut shell, _) = seeded_shell(&["p-1", "p-2"]).await;
        shell.login(token()).await.unwrap();

        shell.switch_player(PlayerId::new("p-2")).await.unwrap();
        assert_eq!(shell.active_player(), Some(&PlayerId::new("p-2")));

        let err = shell.switch_player(PlayerId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, GameError::SessionInvalid { .. }));
        // The previous selection survives a failed switch.
        assert_eq!(shell.active_player(), Some(&PlayerId::new("p-2")));
    }

    #[tokio::test]
    async fn add_member_persists_and_becomes_active_when_first() {
        let (mut shell, store) = seeded_shell(&[]).await;
        shell.login(token()).await.unwrap();

        let id = shell.add_member("  Ana  ", AVATARS[0]).await.unwrap();
        assert_eq!(shell.members().len(), 1);
        assert_eq!(shell.members()[0].name, "Ana");
        assert_eq!(shell.active_player(), Some(&id));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn add_member_keeps_the_current_selection() {
        let (mut shell, _) = seeded_shell(&["p-1"]).await;
        shell.login(token()).await.unwrap();

        shell.add_member("Leo", AVATARS[1]).await.unwrap();
        assert_eq!(shell.members().len(), 2);
        assert_eq!(shell.active_player(), Some(&PlayerId::new("p-1")));
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let (mut shell, store) = seeded_shell(&[]).await;
        shell.login(token()).await.unwrap();

        let err = shell.add_member("   ", AVATARS[0]).await.unwrap_err();
        assert!(matches!(err, GameError::Validation { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn member_operations_require_a_login() {
        let (mut shell, _) = seeded_shell(&[]).await;
        assert!(shell.add_member("Ana", AVATARS[0]).await.is_err());
        assert!(shell.switch_player(PlayerId::new("p-1")).await.is_err());
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let (mut shell, _) = seeded_shell(&["p-1"]).await;
        shell.login(token()).await.unwrap();
        shell.logout();

        assert!(!shell.is_logged_in());
        assert!(shell.members().is_empty());
        assert!(shell.active_player().is_none());
    }

    #[tokio::test]
    async fn session_context_needs_an_active_player() {
        let (mut shell, _) = seeded_shell(&["p-1"]).await;
        let difficulty = Difficulty::validated(5).unwrap();
        assert!(shell.session_context(difficulty).is_err());

        shell.login(token()).await.unwrap();
        let ctx = shell.session_context(difficulty).unwrap();
        assert_eq!(ctx.player, PlayerId::new("p-1"));
        assert_eq!(ctx.family, token());
        assert_eq!(ctx.difficulty, difficulty);
    }

    #[test]
    fn a_dozen_avatars_to_pick_from() {
        assert_eq!(AVATARS.len(), 12);
    }

    #[test]
    fn saved_session_round_trips() {
        let saved = SavedSession {
            family: token(),
            player: PlayerId::new("p-1"),
        };
        let json = serde_json::to_string(&saved).unwrap();
        let back: SavedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, saved);
    }
}
