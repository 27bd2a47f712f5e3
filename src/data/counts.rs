use std::collections::HashMap;
use std::hash::Hash;

/// Count occurrences of each key, most frequent first.
///
/// Keys are tallied in first-encountered order and then stably sorted by
/// descending count, so ties keep the order in which keys first appeared.
pub fn value_counts<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut position: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for value in values {
        match position.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
