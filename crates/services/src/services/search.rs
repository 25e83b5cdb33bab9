//! Client-side search over the loaded collection: substring filtering and a
//! ranked suggestion popover.

use std::collections::HashSet;

use domain::models::{blog::Blog, cliente::Cliente, producto::Producto, user::User};

pub const MAX_SUGGESTIONS: usize = 6;

/// The single name field searched for each entity type.
pub trait Searchable {
    fn search_title(&self) -> &str;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_title(&self) -> &str {
        (**self).search_title()
    }
}

impl Searchable for Blog {
    fn search_title(&self) -> &str {
        self.title()
    }
}

impl Searchable for Producto {
    fn search_title(&self) -> &str {
        self.title()
    }
}

impl Searchable for Cliente {
    fn search_title(&self) -> &str {
        &self.name
    }
}

impl Searchable for User {
    fn search_title(&self) -> &str {
        &self.name
    }
}

/// Distinct non-empty titles in first-seen order.
pub fn unique_titles<T: Searchable>(items: &[T]) -> Vec<&str> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|item| item.search_title().trim())
        .filter(|title| !title.is_empty() && seen.insert(*title))
        .collect()
}

/// Case-insensitive substring match on the title. A blank query keeps
/// every item in its original order.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.search_title().to_lowercase().contains(&needle))
        .collect()
}

/// Ranks titles containing `query`: exact match first, then prefix
/// matches, then by where the query first occurs. Ties keep input order.
pub fn rank_suggestions<'a>(titles: &[&'a str], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    let mut ranked: Vec<((u8, usize), &'a str)> = titles
        .iter()
        .filter_map(|title| {
            let haystack = title.to_lowercase();
            let offset = haystack.find(&needle)?;
            let position = haystack[..offset].chars().count();
            let tier = if haystack == needle {
                0
            } else if position == 0 {
                1
            } else {
                2
            };
            Some(((tier, position), *title))
        })
        .collect();
    ranked.sort_by_key(|(rank, _)| *rank);
    ranked
        .into_iter()
        .map(|(_, title)| title)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Query, suggestions and popover state of a search bar. Everything is
/// recomputed synchronously on each keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    suggestions: Vec<String>,
    open: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_query<T: Searchable>(&mut self, query: impl Into<String>, items: &[T]) {
        self.query = query.into();
        let titles = unique_titles(items);
        self.suggestions = rank_suggestions(&titles, &self.query)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.open = !self.query.trim().is_empty() && !self.suggestions.is_empty();
    }

    /// Picking a suggestion fills the query with it and closes the popover.
    pub fn select(&mut self, index: usize) -> Option<&str> {
        let choice = self.suggestions.get(index)?.clone();
        self.query = choice;
        self.open = false;
        Some(self.query.as_str())
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.suggestions.clear();
        self.open = false;
    }

    /// A pointer interaction outside the popover closes it.
    pub fn pointer_outside(&mut self) {
        self.open = false;
    }

    pub fn apply<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        filter(items, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Titled(&'static str);

    impl Searchable for Titled {
        fn search_title(&self) -> &str {
            self.0
        }
    }

    fn items(titles: &[&'static str]) -> Vec<Titled> {
        titles.iter().map(|t| Titled(*t)).collect()
    }

    #[test]
    fn test_rank_suggestions_led() {
        let titles = ["Panel LED", "Letrero LED Premium", "LED Barra"];
        let ranked = rank_suggestions(&titles, "led");
        assert_eq!(ranked, vec!["LED Barra", "Panel LED", "Letrero LED Premium"]);
    }

    #[test]
    fn test_rank_counts_characters_not_bytes() {
        let titles = ["Panel grande LED", "Señalética LED"];
        let ranked = rank_suggestions(&titles, "led");
        assert_eq!(ranked, vec!["Señalética LED", "Panel grande LED"]);
    }

    #[test]
    fn test_rank_exact_before_prefix_and_limit() {
        let titles = [
            "Mi letrero", "Letrero", "Letrero acrílico", "Letreros", "Gran letrero", "Un letrero",
            "Otro letrero", "Letrero neón",
        ];
        let ranked = rank_suggestions(&titles, "LETRERO");
        assert_eq!(ranked.len(), MAX_SUGGESTIONS);
        assert_eq!(ranked[0], "Letrero");
        assert_eq!(&ranked[1..4], &["Letrero acrílico", "Letreros", "Letrero neón"]);
        assert_eq!(ranked[4], "Mi letrero");
        assert_eq!(ranked[5], "Un letrero");
    }

    #[test]
    fn test_filter_blank_and_idempotent() {
        let all = items(&["Panel LED", "Vinil", "Letrero LED"]);
        let unchanged = filter(&all, "");
        assert_eq!(unchanged.len(), 3);
        assert_eq!(unchanged[1].0, "Vinil");

        let once = filter(&all, "led");
        let twice = filter(&once, "led");
        assert_eq!(
            once.iter().map(|t| t.0).collect::<Vec<_>>(),
            twice.iter().map(|t| t.0).collect::<Vec<_>>()
        );
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_unique_titles() {
        let all = items(&["Vinil", "", "Vinil", "Panel"]);
        assert_eq!(unique_titles(&all), vec!["Vinil", "Panel"]);
    }

    #[test]
    fn test_search_state_popover() {
        let all = items(&["Panel LED", "Vinil"]);
        let mut state = SearchState::new();

        state.set_query("le", &all);
        assert!(state.is_open());
        assert_eq!(state.suggestions(), &["Panel LED".to_string()]);

        state.pointer_outside();
        assert!(!state.is_open());

        state.set_query("zzz", &all);
        assert!(!state.is_open());

        state.set_query("vin", &all);
        assert_eq!(state.select(0), Some("Vinil"));
        assert!(!state.is_open());
        assert_eq!(state.apply(&all).len(), 1);

        state.clear();
        assert_eq!(state.query(), "");
        assert_eq!(state.apply(&all).len(), 2);
    }
}
