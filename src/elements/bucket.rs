use std::collections::BTreeMap;

use crate::core::model::{Granularity, TextElement};

/// Bucket keys visited by the composer, in row order.
pub const ALPHABET: [char; 26] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Items grouped by bucket key. Order within a bucket is insertion order.
#[derive(Debug, Clone)]
pub struct BucketMap<T> {
    buckets: BTreeMap<String, Vec<T>>,
}

impl<T> Default for BucketMap<T> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<T> BucketMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, item: T) {
        self.buckets.entry(key.into()).or_default().push(item);
    }

    /// Appends `items` to `key`, creating the bucket even if `items` is empty.
    pub fn extend(&mut self, key: impl Into<String>, items: impl IntoIterator<Item = T>) {
        self.buckets.entry(key.into()).or_default().extend(items);
    }

    /// Items for `key`; empty when the key was never seen.
    pub fn get(&self, key: &str) -> &[T] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.buckets
            .iter()
            .map(|(key, items)| (key.as_str(), items.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Groups `items` by `key_fn`, skipping items it maps to `None`.
pub fn index_by<T, I, F>(items: I, mut key_fn: F) -> BucketMap<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<String>,
{
    let mut map = BucketMap::new();
    for item in items {
        if let Some(key) = key_fn(&item) {
            map.insert(key, item);
        }
    }
    map
}

/// Groups elements by the granularity's bucket key. Keys outside `a..z`
/// are kept even though the composer never visits them.
pub fn index(elements: &[TextElement], granularity: Granularity) -> BucketMap<TextElement> {
    index_by(elements.iter().cloned(), |element| {
        granularity.bucket_key(element)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn element(content: &str, x: i32) -> TextElement {
        TextElement {
            content: content.to_string(),
            x,
            y: 0,
            width: 10,
            height: 10,
            confidence: 80.0,
        }
    }

    #[test]
    fn letters_group_case_insensitively_in_order() {
        let elements = vec![element("A", 0), element("b", 10), element("a", 20)];
        let map = index(&elements, Granularity::Character);

        let xs: Vec<i32> = map.get("a").iter().map(|e| e.x).collect();
        assert_eq!(xs, vec![0, 20]);
        assert_eq!(map.get("b").len(), 1);
        assert!(map.get("z").is_empty());
    }

    #[test]
    fn words_group_by_initial() {
        let elements = vec![element("Apple", 0), element("apple", 30), element("pear", 60)];
        let map = index(&elements, Granularity::Word);
        assert_eq!(map.get("a").len(), 2);
        assert_eq!(map.get("p")[0].content, "pear");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn non_letter_keys_are_indexed() {
        let elements = vec![element("7", 0), element(",", 10), element("x", 20)];
        let map = index(&elements, Granularity::Character);
        assert!(map.contains_key("7"));
        assert!(map.contains_key(","));
        assert_eq!(map.item_count(), 3);
        let visible = ALPHABET
            .iter()
            .filter(|letter| !map.get(&letter.to_string()).is_empty())
            .count();
        assert_eq!(visible, 1);
    }
}
