use super::Item;

/// Ordered field value. Position is the only ordering key.
pub type ItemList = Vec<Item>;

/// Copy of `items` with the entry at `from` moved to `to`.
///
/// Returns `None` when either index is out of range.
pub fn moved(items: &[Item], from: usize, to: usize) -> Option<ItemList> {
    if from >= items.len() || to >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    let entry = next.remove(from);
    next.insert(to, entry);
    Some(next)
}

/// Copy of `items` without the entry at `index`.
pub fn without(items: &[Item], index: usize) -> Option<ItemList> {
    if index >= items.len() {
        return None;
    }
    let mut next = items.to_vec();
    next.remove(index);
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn list(ids: &[&str]) -> ItemList {
        ids.iter()
            .map(|id| Item::try_from(json!({ "id": id })).unwrap())
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<String> {
        items.iter().filter_map(Item::id).collect()
    }

    #[test]
    fn moves_entries_forward_and_back() {
        let items = list(&["a", "b", "c"]);
        assert_eq!(ids(&moved(&items, 0, 2).unwrap()), ["b", "c", "a"]);
        assert_eq!(ids(&moved(&items, 2, 0).unwrap()), ["c", "a", "b"]);
        assert_eq!(ids(&moved(&items, 1, 1).unwrap()), ["a", "b", "c"]);
    }

    #[test]
    fn move_out_of_range_is_rejected() {
        let items = list(&["a"]);
        assert!(moved(&items, 0, 1).is_none());
        assert!(moved(&[], 0, 0).is_none());
    }

    #[test]
    fn removes_by_index() {
        let items = list(&["a", "b"]);
        assert_eq!(ids(&without(&items, 0).unwrap()), ["b"]);
        assert!(without(&items, 2).is_none());
        assert!(without(&list(&["only"]), 0).unwrap().is_empty());
    }
}
