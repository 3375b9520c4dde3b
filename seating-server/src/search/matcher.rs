//! Search resolution: exact guest, or a ranked list of candidates

use shared::models::Guest;

use super::normalize::normalize;
use super::{ExactMatchPolicy, SearchOptions};

/// Shortest query (in chars) that is matched fuzzily
const MIN_FUZZY_LEN: usize = 2;

/// Contact fields count half as much as the name
const CONTACT_WEIGHT: f64 = 0.5;

/// Result of resolving a query against the guest list
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Exact(Guest),
    Similar(Vec<Guest>),
}

/// Resolve `query` against `guests`
///
/// Exact first (per policy), then every guest whose name contains the
/// query, then fuzzy matching. A blank query resolves to an empty list;
/// callers reject it before getting here.
pub fn resolve(query: &str, guests: &[Guest], options: &SearchOptions) -> SearchOutcome {
    let query = normalize(query);
    if query.is_empty() {
        return SearchOutcome::Similar(Vec::new());
    }

    let names: Vec<String> = guests.iter().map(|g| normalize(&g.name)).collect();

    if let Some(index) = exact_index(&query, &names, options.exact_policy) {
        return SearchOutcome::Exact(guests[index].clone());
    }

    let mut containing: Vec<Guest> = guests
        .iter()
        .zip(&names)
        .filter(|(_, name)| name.contains(&query))
        .map(|(g, _)| g.clone())
        .collect();
    if !containing.is_empty() {
        containing.sort_by(|a, b| a.name.cmp(&b.name));
        return SearchOutcome::Similar(containing);
    }

    SearchOutcome::Similar(fuzzy(&query, guests, &names, options.min_similarity))
}

fn exact_index(query: &str, names: &[String], policy: ExactMatchPolicy) -> Option<usize> {
    if let Some(index) = single(names.iter().map(|n| n == query)) {
        return Some(index);
    }
    match policy {
        ExactMatchPolicy::FullName => None,
        ExactMatchPolicy::UniqueSubstring => single(names.iter().map(|n| n.contains(query))),
    }
}

/// Index of the only `true`, if exactly one
fn single(hits: impl Iterator<Item = bool>) -> Option<usize> {
    let mut found = None;
    for (i, hit) in hits.enumerate() {
        if hit {
            if found.is_some() {
                return None;
            }
            found = Some(i);
        }
    }
    found
}

fn fuzzy(query: &str, guests: &[Guest], names: &[String], min_similarity: f64) -> Vec<Guest> {
    if query.chars().count() < MIN_FUZZY_LEN {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &Guest)> = guests
        .iter()
        .zip(names)
        .map(|(guest, name)| (score(query, guest, name), guest))
        .filter(|(score, _)| *score >= min_similarity)
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    scored.into_iter().map(|(_, g)| g.clone()).collect()
}

fn score(query: &str, guest: &Guest, name: &str) -> f64 {
    let contact = [guest.email.as_deref(), guest.phone.as_deref()]
        .into_iter()
        .flatten()
        .map(|c| window_similarity(query, &normalize(c)))
        .fold(0.0, f64::max);

    name_similarity(query, name).max(CONTACT_WEIGHT * contact)
}

/// Best of: whole-name Levenshtein, best aligned window, best single word
fn name_similarity(query: &str, name: &str) -> f64 {
    let word = name
        .split(' ')
        .map(|w| strsim::jaro_winkler(query, w))
        .fold(0.0, f64::max);

    strsim::normalized_levenshtein(query, name)
        .max(window_similarity(query, name))
        .max(word)
}

/// Normalized Levenshtein of `query` against every same-length window of `text`
fn window_similarity(query: &str, text: &str) -> f64 {
    let text: Vec<char> = text.chars().collect();
    let len = query.chars().count();
    if len == 0 || text.is_empty() {
        return 0.0;
    }
    if text.len() <= len {
        let text: String = text.iter().collect();
        return strsim::normalized_levenshtein(query, &text);
    }

    text.windows(len)
        .map(|w| {
            let window: String = w.iter().collect();
            strsim::normalized_levenshtein(query, &window)
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest(id: &str, name: &str) -> Guest {
        Guest {
            id: id.to_string(),
            name: name.to_string(),
            email: None,
            phone: None,
            places: 1,
            children: 0,
            table_id: "t1".to_string(),
            arrived: false,
            arrival_time: None,
        }
    }

    fn guests() -> Vec<Guest> {
        vec![
            guest("g1", "Alice Martin"),
            guest("g2", "Bob Durand"),
            guest("g3", "Élodie Lefèvre"),
            guest("g4", "Alice Bernard"),
        ]
    }

    fn options(policy: ExactMatchPolicy) -> SearchOptions {
        SearchOptions {
            exact_policy: policy,
            min_similarity: 0.5,
        }
    }

    #[test]
    fn test_full_name_ignores_case_and_accents() {
        let outcome = resolve(
            "  elodie   LEFEVRE ",
            &guests(),
            &options(ExactMatchPolicy::FullName),
        );
        assert!(matches!(outcome, SearchOutcome::Exact(g) if g.id == "g3"));
    }

    #[test]
    fn test_unique_substring_policy() {
        let list = guests();

        let outcome = resolve("durand", &list, &options(ExactMatchPolicy::UniqueSubstring));
        assert!(matches!(outcome, SearchOutcome::Exact(g) if g.id == "g2"));

        let outcome = resolve("durand", &list, &options(ExactMatchPolicy::FullName));
        match outcome {
            SearchOutcome::Similar(found) => {
                assert_eq!(found.len(), 1);
                assert_eq!(found[0].id, "g2");
            }
            other => panic!("expected similar list, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_substring_lists_all_sorted() {
        let outcome = resolve("alice", &guests(), &options(ExactMatchPolicy::UniqueSubstring));
        match outcome {
            SearchOutcome::Similar(found) => {
                let ids: Vec<&str> = found.iter().map(|g| g.id.as_str()).collect();
                assert_eq!(ids, vec!["g4", "g1"]);
            }
            other => panic!("expected similar list, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_full_names_are_not_exact() {
        let list = vec![guest("g1", "Jean Dupont"), guest("g2", "Jean  Dupont")];
        let outcome = resolve("jean dupont", &list, &options(ExactMatchPolicy::UniqueSubstring));
        match outcome {
            SearchOutcome::Similar(found) => assert_eq!(found.len(), 2),
            other => panic!("expected similar list, got {:?}", other),
        }
    }

    #[test]
    fn test_fuzzy_ranks_closest_first() {
        let outcome = resolve("martn", &guests(), &options(ExactMatchPolicy::UniqueSubstring));
        match outcome {
            SearchOutcome::Similar(found) => {
                assert!(!found.is_empty());
                assert_eq!(found[0].id, "g1");
            }
            other => panic!("expected similar list, got {:?}", other),
        }
    }

    #[test]
    fn test_fuzzy_threshold_and_short_query() {
        let list = guests();

        let outcome = resolve("qqqq", &list, &options(ExactMatchPolicy::UniqueSubstring));
        assert_eq!(outcome, SearchOutcome::Similar(Vec::new()));

        let outcome = resolve("z", &list, &options(ExactMatchPolicy::UniqueSubstring));
        assert_eq!(outcome, SearchOutcome::Similar(Vec::new()));
    }

    #[test]
    fn test_fuzzy_matches_contact_fields() {
        let mut with_phone = guest("g9", "Zacharie Quint");
        with_phone.phone = Some("06 12 34 56 78".to_string());
        let list = vec![with_phone];

        let outcome = resolve("12 34", &list, &options(ExactMatchPolicy::UniqueSubstring));
        match outcome {
            SearchOutcome::Similar(found) => assert_eq!(found[0].id, "g9"),
            other => panic!("expected similar list, got {:?}", other),
        }
    }

    #[test]
    fn test_window_similarity() {
        assert_eq!(window_similarity("martin", "alice martin"), 1.0);
        assert!(window_similarity("martn", "alice martin") >= 0.8);
        assert_eq!(window_similarity("", "abc"), 0.0);
    }
}
