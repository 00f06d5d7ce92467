//! Canonical identity for place candidates and duplicate collapsing.
//!
//! The three upstream searches overlap heavily, so the same restaurant often
//! arrives two or three times. Two candidates are the same place when their
//! identities are equal.

use std::collections::HashSet;

use foodspot_core::RawCandidate;
use sha2::{Digest, Sha256};

/// Stable identity for a candidate.
///
/// The provider id when one is present; otherwise a hex SHA-256 over the
/// lower-cased name, lower-cased address and the coordinate at 4 decimal
/// places (`lng,lat`), NUL-separated.
#[must_use]
pub fn compute_identity(candidate: &RawCandidate) -> String {
    if let Some(id) = candidate
        .provider_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    {
        return id.to_string();
    }

    let input = format!(
        "{}\x00{}\x00{:.4},{:.4}",
        candidate.name.as_deref().unwrap_or("").to_lowercase(),
        candidate.address.as_deref().unwrap_or("").to_lowercase(),
        candidate.coordinate.longitude(),
        candidate.coordinate.latitude(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Keeps the first candidate seen for each identity, preserving input order.
///
/// Returns each survivor paired with its identity so callers do not hash twice.
#[must_use]
pub fn deduplicate(candidates: Vec<RawCandidate>) -> Vec<(String, RawCandidate)> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    let mut unique = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let identity = compute_identity(&candidate);
        if seen.insert(identity.clone()) {
            unique.push((identity, candidate));
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodspot_core::Coordinate;

    fn at(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn with_id(id: &str, name: &str) -> RawCandidate {
        RawCandidate {
            provider_id: Some(id.to_string()),
            ..RawCandidate::named(name, at(28.6, 77.2))
        }
    }

    #[test]
    fn provider_id_wins_when_present() {
        assert_eq!(compute_identity(&with_id("place-1", "Anything")), "place-1");
    }

    #[test]
    fn blank_provider_id_falls_back_to_digest() {
        let candidate = RawCandidate {
            provider_id: Some("  ".to_string()),
            ..RawCandidate::named("Sagar Ratna", at(28.6, 77.2))
        };
        let identity = compute_identity(&candidate);
        assert_eq!(identity.len(), 64);
        assert!(identity.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_ignores_case_and_sub_grid_jitter() {
        let a = RawCandidate {
            address: Some("Janpath, New Delhi".to_string()),
            ..RawCandidate::named("Sagar Ratna", at(28.613_91, 77.209_01))
        };
        let b = RawCandidate {
            address: Some("JANPATH, NEW DELHI".to_string()),
            ..RawCandidate::named("SAGAR RATNA", at(28.613_94, 77.208_99))
        };
        assert_eq!(compute_identity(&a), compute_identity(&b));
    }

    #[test]
    fn digest_differs_for_different_places() {
        let a = RawCandidate::named("Sagar Ratna", at(28.6139, 77.209));
        let b = RawCandidate::named("Sagar Ratna", at(28.6239, 77.209));
        assert_ne!(compute_identity(&a), compute_identity(&b));
    }

    #[test]
    fn deduplicate_keeps_first_and_preserves_order() {
        let input = vec![
            with_id("a", "First A"),
            with_id("b", "B"),
            with_id("a", "Second A"),
            with_id("c", "C"),
            with_id("b", "Second B"),
        ];
        let out = deduplicate(input);
        let names: Vec<&str> = out
            .iter()
            .map(|(_, c)| c.name.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(names, vec!["First A", "B", "C"]);
        let ids: Vec<&str> = out.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let input = vec![
            with_id("a", "A"),
            RawCandidate::named("Unnamed Dhaba", at(28.61, 77.21)),
            with_id("a", "A again"),
            RawCandidate::named("unnamed dhaba", at(28.61, 77.21)),
        ];
        let once: Vec<RawCandidate> = deduplicate(input).into_iter().map(|(_, c)| c).collect();
        let twice: Vec<RawCandidate> = deduplicate(once.clone())
            .into_iter()
            .map(|(_, c)| c)
            .collect();
        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn deduplicate_empty_input() {
        assert!(deduplicate(Vec::new()).is_empty());
    }
}
