use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry ordered so the heap top is the weakest candidate: lowest
/// score first, and among equal scores the one seen last.
struct Ranked<T, S> {
    score: S,
    seq: usize,
    item: T,
}

impl<T, S: Ord> Ord for Ranked<T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.seq.cmp(&other.seq))
    }
}

impl<T, S: Ord> PartialOrd for Ranked<T, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, S: Ord> PartialEq for Ranked<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T, S: Ord> Eq for Ranked<T, S> {}

/// Select the `k` highest-scored items, best first.
///
/// Keeps a bounded heap of `k` candidates: the first `k` items seed it, and
/// every later item replaces the weakest candidate only when its score is
/// strictly greater. Equal scores therefore keep the earlier item, and the
/// output lists equal scores in input order. `k == 0` or an empty input gives
/// an empty result; `k` beyond the input length sorts everything.
pub fn top_k<T, S, I>(items: I, k: usize) -> Vec<T>
where
    I: IntoIterator<Item = (T, S)>,
    S: Ord,
{
    if k == 0 {
        return Vec::new();
    }

    let mut items = items
        .into_iter()
        .enumerate()
        .map(|(seq, (item, score))| Ranked { score, seq, item });

    let mut heap: BinaryHeap<Ranked<T, S>> = items.by_ref().take(k).collect();
    for candidate in items {
        if let Some(mut weakest) = heap.peek_mut() {
            if candidate.score > weakest.score {
                *weakest = candidate;
            }
        }
    }

    heap.into_sorted_vec().into_iter().map(|r| r.item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_basic() {
        let scores = vec![("a", 3), ("b", 9), ("c", 1), ("d", 7), ("e", 5)];
        assert_eq!(top_k(scores, 3), vec!["b", "d", "e"]);
    }

    #[test]
    fn test_top_k_zero() {
        let scores = vec![("a", 3), ("b", 9)];
        assert!(top_k(scores, 0).is_empty());
    }

    #[test]
    fn test_top_k_empty_input() {
        let scores: Vec<(&str, u32)> = Vec::new();
        assert!(top_k(scores, 5).is_empty());
    }

    #[test]
    fn test_top_k_exceeds_input_sorts_all() {
        let scores = vec![("a", 2), ("b", 8), ("c", 5)];
        assert_eq!(top_k(scores, 10), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_top_k_ties_keep_first_seen() {
        let scores = vec![("a", 4), ("b", 4), ("c", 4), ("d", 1)];
        assert_eq!(top_k(scores.clone(), 2), vec!["a", "b"]);
        assert_eq!(top_k(scores, 4), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_top_k_later_tie_does_not_evict() {
        // "c" ties with the weakest kept item, so it is not admitted
        let scores = vec![("a", 5), ("b", 2), ("c", 2), ("d", 6)];
        assert_eq!(top_k(scores, 2), vec!["d", "a"]);
        let scores = vec![("a", 5), ("b", 2), ("c", 2)];
        assert_eq!(top_k(scores, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_top_k_single() {
        let scores = vec![(1u32, 10usize), (2, 30), (3, 20)];
        assert_eq!(top_k(scores, 1), vec![2]);
    }
}
