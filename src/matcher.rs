// 🔤 Approximate Matcher - "did you mean" suggestions
// Normalized Levenshtein similarity over a catalog of known names

/// Minimum similarity (0.0 - 1.0) a candidate must reach to be suggested
pub const ACCEPTANCE_THRESHOLD: f64 = 0.4;

/// Similarity between two names, case-insensitive and ignoring surrounding whitespace
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        return 1.0;
    }

    strsim::normalized_levenshtein(&a, &b)
}

/// Return the closest catalog name to `query`, or `None` if nothing clears
/// [`ACCEPTANCE_THRESHOLD`].
///
/// Ties resolve to the first entry in catalog order.
pub fn suggest(query: &str, catalog: &[String]) -> Option<String> {
    if catalog.is_empty() {
        return None;
    }

    let mut best: Option<(&String, f64)> = None;

    for candidate in catalog {
        let score = similarity(query, candidate);
        if score < ACCEPTANCE_THRESHOLD {
            continue;
        }

        // Strictly greater keeps the earliest entry on ties
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }

        if score >= 1.0 {
            break;
        }
    }

    best.map(|(name, _)| name.clone())
}

// ============================================================================
// TESTS
// ============================================================================
