use std::collections::HashSet;
use std::hash::Hash;

/// Distinct items of `items` that do not appear in `allowed`, in first-seen order.
pub fn missing_from<'a, T>(items: &'a [T], allowed: &[T]) -> Vec<&'a T>
    where
        T: Eq + Hash,
{
    let allowed: HashSet<&T> = allowed.iter().collect();
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !allowed.contains(item) && seen.insert(*item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_from() {
        let allowed = ["a", "b", "c"];
        assert!(missing_from(&["a", "c"], &allowed).is_empty());
        assert_eq!(missing_from(&["d", "a", "d", "e"], &allowed), vec![&"d", &"e"]);
    }

    #[test]
    fn test_missing_from_ignores_duplicates() {
        assert!(missing_from(&["a", "a", "b"], &["a", "b"]).is_empty());
        assert!(missing_from::<&str>(&[], &["a"]).is_empty());
        assert_eq!(missing_from(&["x", "x"], &[]), vec![&"x"]);
    }
}
