//! Fixed-size grouping of a sequence.

use std::iter::Peekable;

use crate::Result;
use crate::error::Error;

/// Split `items` into consecutive groups of at most `count` elements.
///
/// Every group except possibly the last holds exactly `count` elements, and
/// input order is preserved. Grouping an empty sequence is rejected, as is a
/// `count` of zero.
///
/// ```
/// use rowmodel_core::group_by_count;
///
/// let groups: Vec<Vec<i32>> = group_by_count(1..=5, 2).unwrap().collect();
/// assert_eq!(groups, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn group_by_count<I>(items: I, count: usize) -> Result<GroupByCount<I::IntoIter>>
where
    I: IntoIterator,
{
    if count == 0 {
        return Err(Error::invalid_argument(
            "Group size must be greater than zero",
        ));
    }
    let mut inner = items.into_iter().peekable();
    if inner.peek().is_none() {
        return Err(Error::invalid_argument("Can not group an empty sequence"));
    }
    Ok(GroupByCount { inner, count })
}

/// Iterator returned by [`group_by_count`].
pub struct GroupByCount<I: Iterator> {
    inner: Peekable<I>,
    count: usize,
}

impl<I> std::fmt::Debug for GroupByCount<I>
where
    I: Iterator + std::fmt::Debug,
    I::Item: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupByCount")
            .field("inner", &self.inner)
            .field("count", &self.count)
            .finish()
    }
}

impl<I: Iterator> Iterator for GroupByCount<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.peek()?;
        Some(self.inner.by_ref().take(self.count).collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        (lo.div_ceil(self.count), hi.map(|h| h.div_ceil(self.count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_group_holds_the_remainder() {
        let groups: Vec<_> = group_by_count(vec![1, 2, 3, 4, 5], 2).unwrap().collect();
        assert_eq!(groups, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[test]
    fn exact_multiple_has_no_short_group() {
        let groups: Vec<_> = group_by_count(["a", "b", "c", "d"], 2).unwrap().collect();
        assert_eq!(groups, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn oversized_count_yields_one_group() {
        let groups: Vec<_> = group_by_count(1..=3, 10).unwrap().collect();
        assert_eq!(groups, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let err = group_by_count(Vec::<i32>::new(), 2).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(err.to_string().contains("Can not group an empty sequence"));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(matches!(
            group_by_count(1..=3, 0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn size_hint_counts_groups() {
        let groups = group_by_count(0..7, 3).unwrap();
        assert_eq!(groups.size_hint(), (3, Some(3)));
    }
}
