//! Citation re-indexing.
//!
//! Models number their sources however they like — gaps, duplicates,
//! arbitrary starting points. Re-indexing assigns clean sequential output
//! indices in order of first appearance and rewrites the `[N]` markers in
//! the explanation to match. Markers citing an index no source carried are
//! left untouched (dangling citations are visible, not hidden).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::parse::RawSource;
use crate::types::Source;

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]").expect("invalid citation pattern"));

/// Re-index parsed sources and rewrite citation markers.
///
/// Sources are scanned in their given order: each source whose
/// model-supplied index is present and not yet seen receives the next
/// sequential output index (starting at 1); sources with a missing or
/// already-seen index are skipped. Every `[N]` marker in the explanation is
/// then rewritten through the original→new mapping in a single pass;
/// markers with no mapping entry stay unchanged.
pub(crate) fn remap(sources: Vec<RawSource>, explanation: String) -> (Vec<Source>, String) {
    if sources.is_empty() {
        return (Vec::new(), explanation);
    }

    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let mut emitted: Vec<Source> = Vec::new();

    for raw in sources {
        let Some(original) = raw.index else {
            continue;
        };
        if mapping.contains_key(&original) {
            continue;
        }
        let assigned = emitted.len() + 1;
        mapping.insert(original, assigned);
        emitted.push(Source {
            index: assigned,
            name: raw.name,
            url: raw.url,
        });
    }

    let rewritten = CITATION_RE
        .replace_all(&explanation, |caps: &regex::Captures<'_>| {
            match caps[1].parse::<usize>().ok().and_then(|n| mapping.get(&n)) {
                Some(new_index) => format!("[{new_index}]"),
                None => caps[0].to_string(),
            }
        })
        .into_owned();

    // Assignment order already equals index order; the sort guards against
    // future reordering of the emit loop.
    emitted.sort_by_key(|source| source.index);

    (emitted, rewritten)
}
