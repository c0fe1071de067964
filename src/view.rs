//! View state behind the match listing page.
//!
//! The page fetches the whole catalog once, then every filter, the search box
//! and pagination run locally over that list. Favorite toggles are applied
//! optimistically: local state changes first and the caller is handed the
//! mutation to send. A failed mutation is surfaced but not rolled back.

use std::collections::BTreeSet;

use crate::games::catalog::{Match, ALL};

pub const PER_PAGE_OPTIONS: [usize; 3] = [3, 6, 9];
pub const DEFAULT_PER_PAGE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// Request the caller must issue after a local favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteMutation {
    Add(i32),
    Remove(i32),
}

impl FavoriteMutation {
    pub fn method(&self) -> &'static str {
        match self {
            FavoriteMutation::Add(_) => "POST",
            FavoriteMutation::Remove(_) => "DELETE",
        }
    }

    pub fn path(&self) -> String {
        match self {
            FavoriteMutation::Add(id) | FavoriteMutation::Remove(id) => format!("/favorites/{id}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GamesView {
    phase: Phase,
    matches: Vec<Match>,
    favorites: BTreeSet<i32>,
    sport: String,
    search: String,
    favorites_only: bool,
    page: usize,
    per_page: usize,
    error: Option<String>,
}

impl Default for GamesView {
    fn default() -> Self {
        Self::new()
    }
}

impl GamesView {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            matches: Vec::new(),
            favorites: BTreeSet::new(),
            sport: ALL.to_string(),
            search: String::new(),
            favorites_only: false,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn selected_sport(&self) -> &str {
        &self.sport
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_favorite(&self, match_id: i32) -> bool {
        self.favorites.contains(&match_id)
    }

    pub fn loaded(&mut self, matches: Vec<Match>) {
        self.matches = matches;
        self.phase = Phase::Ready;
        self.clamp_page();
    }

    /// The catalog fetch failed: show the error over an empty listing.
    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.matches.clear();
        self.error = Some(message.into());
        self.phase = Phase::Ready;
        self.clamp_page();
    }

    /// Favorites fetched from the API. An unauthenticated user simply has none.
    pub fn favorites_loaded(&mut self, ids: impl IntoIterator<Item = i32>) {
        self.favorites = ids.into_iter().collect();
        self.clamp_page();
    }

    /// `"All"` followed by each distinct sport in catalog order.
    pub fn sports(&self) -> Vec<String> {
        let mut out = vec![ALL.to_string()];
        for m in &self.matches {
            if !out.iter().any(|s| s == &m.sport) {
                out.push(m.sport.clone());
            }
        }
        out
    }

    pub fn select_sport(&mut self, sport: impl Into<String>) {
        self.sport = sport.into();
        self.clamp_page();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.clamp_page();
    }

    pub fn toggle_favorites_only(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.clamp_page();
    }

    /// Changing the page size always returns to the first page.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    fn visible(&self, m: &Match) -> bool {
        let sport_ok = self.sport == ALL || m.sport == self.sport;
        let favorite_ok = !self.favorites_only || self.favorites.contains(&m.id);
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || [
                m.team_a.as_deref(),
                m.team_b.as_deref(),
                m.league.as_deref(),
                Some(m.sport.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));
        sport_ok && favorite_ok && search_ok
    }

    pub fn filtered(&self) -> Vec<&Match> {
        self.matches.iter().filter(|m| self.visible(m)).collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.per_page).max(1)
    }

    pub fn page_items(&self) -> Vec<&Match> {
        let start = (self.page - 1) * self.per_page;
        self.filtered()
            .into_iter()
            .skip(start)
            .take(self.per_page)
            .collect()
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }

    /// Flip a favorite locally and return the request that persists it.
    pub fn toggle_favorite(&mut self, match_id: i32) -> FavoriteMutation {
        let mutation = if self.favorites.remove(&match_id) {
            FavoriteMutation::Remove(match_id)
        } else {
            self.favorites.insert(match_id);
            FavoriteMutation::Add(match_id)
        };
        self.clamp_page();
        mutation
    }

    /// Report a failed mutation. Local favorites are left as they are.
    pub fn mutation_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::catalog::fixture::game;

    fn ready(n: i32) -> GamesView {
        let mut view = GamesView::new();
        let sports = ["Football", "Basketball", "Tennis"];
        view.loaded(
            (1..=n)
                .map(|id| game(id, sports[(id as usize - 1) % 3], "ESPN"))
                .collect(),
        );
        view
    }

    fn ids(items: Vec<&Match>) -> Vec<i32> {
        items.iter().map(|m| m.id).collect()
    }

    #[test]
    fn starts_loading_then_ready() {
        let mut view = GamesView::new();
        assert_eq!(view.phase(), Phase::Loading);
        view.loaded(vec![game(1, "Football", "ESPN")]);
        assert_eq!(view.phase(), Phase::Ready);
        assert_eq!(view.page(), 1);
        assert_eq!(view.per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn failed_load_is_ready_and_empty() {
        let mut view = GamesView::new();
        view.load_failed("Error loading games");
        assert_eq!(view.phase(), Phase::Ready);
        assert_eq!(view.error(), Some("Error loading games"));
        assert!(view.filtered().is_empty());
        assert_eq!(view.total_pages(), 1);
    }

    #[test]
    fn sports_are_distinct_in_catalog_order() {
        let view = ready(7);
        assert_eq!(view.sports(), vec!["All", "Football", "Basketball", "Tennis"]);
    }

    #[test]
    fn sport_filter_and_search_compose() {
        let mut view = ready(9);
        view.select_sport("Football");
        assert_eq!(ids(view.filtered()), vec![1, 4, 7]);

        view.set_search("  HOME 4 ");
        assert_eq!(ids(view.filtered()), vec![4]);

        view.select_sport(ALL);
        view.set_search("tennis");
        assert_eq!(ids(view.filtered()), vec![3, 6, 9]);
    }

    #[test]
    fn search_covers_teams_and_league() {
        let mut view = ready(3);
        view.set_search("away 2");
        assert_eq!(ids(view.filtered()), vec![2]);
        view.set_search("basketball league");
        assert_eq!(ids(view.filtered()), vec![2]);
    }

    #[test]
    fn search_skips_missing_fields() {
        let mut sparse = game(5, "Tennis", "ESPN");
        sparse.team_b = None;
        sparse.league = None;
        let mut view = GamesView::new();
        view.loaded(vec![sparse, game(6, "Tennis", "ESPN")]);
        view.set_search("away");
        assert_eq!(ids(view.filtered()), vec![6]);
        view.set_search("home 5");
        assert_eq!(ids(view.filtered()), vec![5]);
    }

    #[test]
    fn pagination_slices_filtered_results() {
        let mut view = ready(14);
        assert_eq!(view.total_pages(), 3);
        assert_eq!(ids(view.page_items()), vec![1, 2, 3, 4, 5, 6]);
        view.next_page();
        view.next_page();
        assert_eq!(ids(view.page_items()), vec![13, 14]);
        view.next_page();
        assert_eq!(view.page(), 3);
        view.go_to(0);
        assert_eq!(view.page(), 1);
        view.prev_page();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn page_clamps_when_results_shrink() {
        let mut view = ready(14);
        view.go_to(3);
        view.select_sport("Tennis");
        // 4 tennis matches fit on one page
        assert_eq!(view.page(), 1);
        assert_eq!(ids(view.page_items()), vec![3, 6, 9, 12]);
    }

    #[test]
    fn per_page_change_resets_to_first_page() {
        let mut view = ready(14);
        view.go_to(2);
        view.set_per_page(PER_PAGE_OPTIONS[0]);
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), 5);
    }

    #[test]
    fn favorite_toggle_is_optimistic() {
        let mut view = ready(6);
        assert_eq!(view.toggle_favorite(4), FavoriteMutation::Add(4));
        assert!(view.is_favorite(4));

        view.toggle_favorites_only();
        assert_eq!(ids(view.filtered()), vec![4]);

        let mutation = view.toggle_favorite(4);
        assert_eq!(mutation, FavoriteMutation::Remove(4));
        assert_eq!(mutation.method(), "DELETE");
        assert_eq!(mutation.path(), "/favorites/4");
        assert!(view.filtered().is_empty());
        assert_eq!(view.total_pages(), 1);
    }

    #[test]
    fn failed_mutation_does_not_roll_back() {
        let mut view = ready(3);
        view.favorites_loaded([2]);
        view.toggle_favorite(1);
        view.mutation_failed("Error adding favorite");
        assert!(view.is_favorite(1));
        assert_eq!(view.favorite_count(), 2);
        assert_eq!(view.error(), Some("Error adding favorite"));
    }
}
