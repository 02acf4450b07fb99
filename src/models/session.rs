use crate::error::Result;
use crate::models::catalog::{Category, Recommendation};
use crate::models::profile::{self, UserProfile, DEFAULT_PROFILE};
use actix_session::Session;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SESSION_KEY: &str = "state";

/// Per-browser session state, stored as a single typed value in the cookie
/// session rather than as loose per-key blobs.
///
/// Cursors are raw counters; they are reduced modulo the recommendation list
/// length at lookup time, so any nonnegative value indexes validly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub profile_name: String,
    pub gave_feedback: bool,
    pub recommendation: Option<Recommendation>,
    pub cursors: BTreeMap<Category, usize>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            profile_name: DEFAULT_PROFILE.to_string(),
            gave_feedback: false,
            recommendation: None,
            cursors: BTreeMap::new(),
        }
    }
}

impl SessionState {
    /// Read the state from the session, starting fresh when absent or
    /// unreadable (an unreadable cookie is treated as a new visitor).
    pub fn load(session: &Session) -> Self {
        session
            .get::<SessionState>(SESSION_KEY)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        session.insert(SESSION_KEY, self)?;
        Ok(())
    }

    /// Landing-page reset: clears the feedback flag, the cached
    /// recommendation and all cursors. The selected profile survives.
    pub fn reset(&mut self) {
        self.gave_feedback = false;
        self.recommendation = None;
        self.cursors.clear();
    }

    /// The active profile, falling back to the default when the stored name
    /// no longer matches a known profile.
    pub fn profile(&self) -> &'static UserProfile {
        profile::by_name(&self.profile_name).unwrap_or_else(profile::default_profile)
    }

    /// Toggle between the two demo profiles.
    pub fn switch_profile(&mut self) {
        self.profile_name = profile::switch_target(&self.profile_name).name.clone();
    }

    pub fn advance_cursor(&mut self, category: Category) {
        *self.cursors.entry(category).or_insert(0) += 1;
    }

    pub fn cursor(&self, category: Category) -> usize {
        self.cursors.get(&category).copied().unwrap_or(0)
    }

    /// Row index currently selected for `category`: the cursor taken modulo
    /// the ranked list length. `None` when there is nothing to show.
    pub fn current_index(&self, category: Category) -> Option<usize> {
        let ranked = self.recommendation.as_ref()?.get(&category)?;
        if ranked.is_empty() {
            return None;
        }
        Some(ranked[self.cursor(category) % ranked.len()])
    }
}
