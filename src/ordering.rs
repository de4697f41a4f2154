//! Name ranking used to order solutions deterministically.

use std::collections::HashMap;

/// Rank given to every name that was never assigned one
pub const UNRANKED: i32 = i32::MAX;

/// Maps names to ranks; lower ranks sort first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingTable {
    ranks: HashMap<String, i32>,
}

impl OrderingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rank of `name`
    pub fn set(&mut self, name: impl Into<String>, rank: i32) {
        self.ranks.insert(name.into(), rank);
    }

    /// Rank of `name`, or [`UNRANKED`]
    pub fn get(&self, name: &str) -> i32 {
        self.ranks.get(name).copied().unwrap_or(UNRANKED)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for OrderingTable {
    fn from_iter<T: IntoIterator<Item = (S, i32)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (name, rank) in iter {
            table.set(name, rank);
        }
        table
    }
}

/// Composite sort key `(student rank, student, impl rank, impl)`
pub type OrderingKey<'a> = (i32, &'a str, i32, &'a str);

/// Build the composite key for one solution
pub fn ordering_key<'a>(
    students: &OrderingTable,
    impls: &OrderingTable,
    student: &'a str,
    implementation: &'a str,
) -> OrderingKey<'a> {
    (
        students.get(student),
        student,
        impls.get(implementation),
        implementation,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unranked_sorts_last() {
        let table: OrderingTable = [("naive", 1), ("fast", 7)].into_iter().collect();
        assert_eq!(table.get("naive"), 1);
        assert_eq!(table.get("fast"), 7);
        assert_eq!(table.get("missing"), UNRANKED);
        assert!(table.get("missing") >= table.get("fast"));
    }

    #[test]
    fn test_set_overwrites() {
        let mut table = OrderingTable::new();
        table.set("naive", 5);
        table.set("naive", 2);
        assert_eq!(table.get("naive"), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_composite_order() {
        let students = OrderingTable::new();
        let impls: OrderingTable = [("naive", 1)].into_iter().collect();

        let mut entries = vec![
            ("bob", "zeta"),
            ("alice", "nooverflow"),
            ("bob", "naive"),
            ("alice", "naive"),
            ("alice", "alpha"),
        ];
        entries.sort_by(|l, r| {
            ordering_key(&students, &impls, l.0, l.1).cmp(&ordering_key(&students, &impls, r.0, r.1))
        });

        assert_eq!(
            entries,
            vec![
                ("alice", "naive"),
                ("alice", "alpha"),
                ("alice", "nooverflow"),
                ("bob", "naive"),
                ("bob", "zeta"),
            ]
        );
    }

    #[test]
    fn test_ranked_student_goes_first() {
        let students: OrderingTable = [("zoe", 0)].into_iter().collect();
        let impls = OrderingTable::new();

        let zoe = ordering_key(&students, &impls, "zoe", "b");
        let adam = ordering_key(&students, &impls, "adam", "a");
        assert!(zoe < adam);
    }
}
