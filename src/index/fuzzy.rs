//! Approximate matching
//!
//! Levenshtein distance plus the bounded-edit DFS that walks the trie
//! looking for stored terms within a given distance of the query.

use crate::index::node::TrieNode;
use ahash::AHashMap;
use std::cmp::min;

/// Levenshtein distance (edit distance)
///
/// Minimum number of single-character insertions, deletions, and
/// substitutions needed to transform one string into another. Computed
/// over a single DP row: `row[j]` holds the previous row's value until
/// column `j` is rewritten, and the cell the substitution case needs is
/// carried through `diagonal` before it is overwritten.
pub fn levenshtein_distance(source: &str, target: &str) -> u32 {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();

    if source.is_empty() {
        return target.len() as u32;
    }
    if target.is_empty() {
        return source.len() as u32;
    }

    let mut row: Vec<u32> = (0..=target.len() as u32).collect();

    for (i, &sc) in source.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i as u32 + 1;

        for (j, &tc) in target.iter().enumerate() {
            let substitution = diagonal + u32::from(sc != tc);
            diagonal = row[j + 1];
            // deletion comes from the old row above, insertion from the
            // freshly written cell to the left
            row[j + 1] = min(substitution, min(diagonal, row[j]) + 1);
        }
    }

    row[target.len()]
}

/// Walk the trie from `root` collecting every stored term within
/// `max_distance` edits of `word`. Returns term → best distance.
///
/// The traversal carries a running cost as a loose upper bound for
/// cutoff; the reported distance at each end-of-word node is the full
/// dynamic-programming distance, so over-estimates along the path never
/// produce wrong distances, only missed cutoff opportunities.
pub(crate) fn collect_fuzzy_matches(
    root: &TrieNode,
    word: &str,
    max_distance: u32,
) -> AHashMap<String, u32> {
    let query: Vec<char> = word.chars().collect();
    let mut matches = AHashMap::new();
    let mut current = String::new();
    descend(root, &query, word, 0, 0, max_distance, &mut current, &mut matches);
    matches
}

#[allow(clippy::too_many_arguments)]
fn descend(
    node: &TrieNode,
    query: &[char],
    word: &str,
    depth: usize,
    cost: u32,
    max_distance: u32,
    current: &mut String,
    matches: &mut AHashMap<String, u32>,
) {
    if cost > max_distance {
        return;
    }

    if node.is_end_of_word {
        let distance = levenshtein_distance(word, current);
        if distance <= max_distance {
            matches
                .entry(current.clone())
                .and_modify(|d| *d = (*d).min(distance))
                .or_insert(distance);
        }
    }

    for (&ch, child) in &node.children {
        // Substitution: consume one query char and one trie edge;
        // free on a character match
        if depth < query.len() {
            let edit = u32::from(query[depth] != ch);
            current.push(ch);
            descend(
                child,
                query,
                word,
                depth + 1,
                cost + edit,
                max_distance,
                current,
                matches,
            );
            current.pop();
        }

        // Insertion: take the trie edge without consuming a query char
        current.push(ch);
        descend(
            child,
            query,
            word,
            depth,
            cost + 1,
            max_distance,
            current,
            matches,
        );
        current.pop();
    }

    // Deletion: skip a query char, stay on this node
    if depth < query.len() {
        descend(
            node,
            query,
            word,
            depth + 1,
            cost + 1,
            max_distance,
            current,
            matches,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
    }

    #[test]
    fn test_levenshtein_examples() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
        assert_eq!(levenshtein_distance("database", "databse"), 1);
        assert_eq!(levenshtein_distance("javascript", "javascritp"), 2);
    }

    fn tiny_trie(words: &[&str]) -> TrieNode {
        let mut root = TrieNode::root();
        for word in words {
            let mut node = &mut root;
            for c in word.chars() {
                node = node.child_or_insert(c);
            }
            node.is_end_of_word = true;
            node.add_ref("doc");
            node.increment_weight(1.0);
        }
        root
    }

    #[test]
    fn test_fuzzy_exact_at_distance_zero() {
        let root = tiny_trie(&["java", "javascript", "rust"]);
        let matches = collect_fuzzy_matches(&root, "java", 0);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.get("java"), Some(&0));
    }

    #[test]
    fn test_fuzzy_within_bound() {
        let root = tiny_trie(&["java", "lava", "jaba", "rust"]);
        let matches = collect_fuzzy_matches(&root, "java", 1);

        assert_eq!(matches.get("java"), Some(&0));
        assert_eq!(matches.get("lava"), Some(&1));
        assert_eq!(matches.get("jaba"), Some(&1));
        assert!(!matches.contains_key("rust"));
    }

    #[test]
    fn test_fuzzy_transposition_costs_two() {
        let root = tiny_trie(&["javascript"]);
        assert!(collect_fuzzy_matches(&root, "javascritp", 1).is_empty());

        let matches = collect_fuzzy_matches(&root, "javascritp", 2);
        assert_eq!(matches.get("javascript"), Some(&2));
    }

    #[test]
    fn test_fuzzy_length_mismatch() {
        let root = tiny_trie(&["search"]);
        // One trailing insertion and one deletion
        assert_eq!(collect_fuzzy_matches(&root, "searc", 1).get("search"), Some(&1));
        assert_eq!(
            collect_fuzzy_matches(&root, "searchh", 1).get("search"),
            Some(&1)
        );
    }
}
