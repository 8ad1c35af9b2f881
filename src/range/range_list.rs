//! A canonical container of sorted, non-overlapping [`Range`]s.
//!
//! [`RangeList`] wraps a `Vec<Range>` and guarantees the canonical
//! invariant at all times: ranges sorted by `begin`, no two overlap, and
//! adjacent ranges (`end + 1 == next.begin`) are merged. Read access is
//! transparent via `Deref<Target = [Range]>`.

use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;

use super::error::RangeError;
use super::range::Range;

/// A sorted, non-overlapping, merged set of closed integer ranges.
#[derive(Debug, Clone, Default, Eq)]
pub struct RangeList(Vec<Range>);

impl RangeList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Wraps a single range.
    pub fn single(range: Range) -> Self {
        Self(vec![range])
    }

    /// A range list covering exactly `[0, capacity - 1]`.
    pub fn full_capacity(capacity: i64) -> Self {
        if capacity <= 0 {
            return Self::new();
        }
        Self(vec![Range::new(0, capacity - 1)])
    }

    fn normalize(&mut self) {
        if self.0.len() <= 1 {
            return;
        }
        self.0.sort_by_key(|r| r.begin());
        let mut merged: Vec<Range> = Vec::with_capacity(self.0.len());
        for range in self.0.drain(..) {
            match merged.last_mut() {
                Some(last) if last.overlaps(&range) || last.is_adjacent(&range) => {
                    *last = last.merge(&range);
                }
                _ => merged.push(range),
            }
        }
        self.0 = merged;
    }

    /// Total number of indices across all ranges.
    pub fn num_items(&self) -> i64 {
        self.0.iter().map(Range::cardinality).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Lowest index held by this list, if non-empty.
    pub fn lowest(&self) -> Option<i64> {
        self.0.first().map(Range::begin)
    }

    /// Highest index held by this list, if non-empty.
    pub fn highest(&self) -> Option<i64> {
        self.0.last().map(Range::end)
    }

    /// Returns true if `index` is present in any range.
    pub fn contains(&self, index: i64) -> bool {
        self.0
            .binary_search_by(|r| {
                if index < r.begin() {
                    std::cmp::Ordering::Greater
                } else if index > r.end() {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Adds a single range, merging with existing neighbours as needed.
    pub fn add(&mut self, range: Range) {
        self.0.push(range);
        self.normalize();
    }

    /// Unions `other` into `self` (a.k.a. `addAll`).
    pub fn add_all(&mut self, other: &RangeList) {
        self.0.extend_from_slice(&other.0);
        self.normalize();
    }

    /// Returns the union of `self` and `other` as a new list.
    pub fn union(&self, other: &RangeList) -> RangeList {
        let mut out = self.clone();
        out.add_all(other);
        out
    }

    /// Removes (set-difference) `other` from `self` in place.
    pub fn remove(&mut self, other: &RangeList) {
        if other.is_empty() || self.is_empty() {
            return;
        }
        let mut result = Vec::with_capacity(self.0.len());
        for range in self.0.drain(..) {
            let mut remaining = vec![range];
            for sub in other.0.iter() {
                let mut next_remaining = Vec::with_capacity(remaining.len());
                for r in remaining {
                    next_remaining.extend(r.difference(sub));
                }
                remaining = next_remaining;
            }
            result.extend(remaining);
        }
        self.0 = result;
        self.normalize();
    }

    /// Returns `self` minus `other` as a new list, leaving `self` untouched.
    pub fn difference(&self, other: &RangeList) -> RangeList {
        let mut out = self.clone();
        out.remove(other);
        out
    }

    /// Intersects `self` with `other` via a two-pointer sweep over the
    /// sorted, canonical lists.
    pub fn intersection(&self, other: &RangeList) -> RangeList {
        let mut result = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        while i < self.0.len() && j < other.0.len() {
            let left = &self.0[i];
            let right = &other.0[j];
            if left.end() < right.begin() {
                i += 1;
                continue;
            }
            if right.end() < left.begin() {
                j += 1;
                continue;
            }
            if let Some(overlap) = left.intersection(right) {
                result.push(overlap);
            }
            if left.end() < right.end() {
                i += 1;
            } else {
                j += 1;
            }
        }
        let mut out = RangeList(result);
        out.normalize();
        out
    }

    /// Greedily selects the first `k` indices in sort order across ranges.
    ///
    /// Returns `None` if fewer than `k` indices exist in total.
    pub fn select_resources(&self, k: i64) -> Option<RangeList> {
        if k <= 0 {
            return Some(RangeList::new());
        }
        if self.num_items() < k {
            return None;
        }
        let mut remaining = k;
        let mut picked = Vec::new();
        for range in &self.0 {
            if remaining <= 0 {
                break;
            }
            let available = range.cardinality();
            if available <= remaining {
                picked.push(*range);
                remaining -= available;
            } else {
                picked.push(Range::new(range.begin(), range.begin() + remaining - 1));
                remaining = 0;
            }
        }
        let mut out = RangeList(picked);
        out.normalize();
        Some(out)
    }

    /// Content equality: same multiset of indices after canonicalization.
    pub fn equals(&self, other: &RangeList) -> bool {
        self.0 == other.0
    }

    /// Iterator over the canonical ranges.
    pub fn iter(&self) -> std::slice::Iter<'_, Range> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Range> {
        self.0
    }

    pub fn as_slice(&self) -> &[Range] {
        &self.0
    }
}

impl Deref for RangeList {
    type Target = [Range];

    fn deref(&self) -> &[Range] {
        &self.0
    }
}

impl PartialEq for RangeList {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl From<Vec<Range>> for RangeList {
    fn from(vec: Vec<Range>) -> Self {
        let mut list = RangeList(vec);
        list.normalize();
        list
    }
}

impl From<Range> for RangeList {
    fn from(range: Range) -> Self {
        RangeList(vec![range])
    }
}

impl FromIterator<Range> for RangeList {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        RangeList::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for RangeList {
    type Item = Range;
    type IntoIter = std::vec::IntoIter<Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RangeList {
    type Item = &'a Range;
    type IntoIter = std::slice::Iter<'a, Range>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for RangeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", range)?;
        }
        write!(f, "}}")
    }
}

/// Parses `"{[a..b],[c..d],...}"`. Ranges need not be pre-sorted; they are
/// canonicalized on construction.
impl FromStr for RangeList {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| RangeError::ParseError(s.to_string()))?;
        let inner = inner.trim();
        if inner.is_empty() {
            return Ok(RangeList::new());
        }

        let mut ranges = Vec::new();
        for piece in inner.split(',') {
            let piece = piece.trim();
            let body = piece
                .strip_prefix('[')
                .and_then(|p| p.strip_suffix(']'))
                .ok_or_else(|| RangeError::ParseError(s.to_string()))?;
            let (b, e) = body
                .split_once("..")
                .ok_or_else(|| RangeError::ParseError(s.to_string()))?;
            let begin: i64 = b
                .trim()
                .parse()
                .map_err(|_| RangeError::ParseError(s.to_string()))?;
            let end: i64 = e
                .trim()
                .parse()
                .map_err(|_| RangeError::ParseError(s.to_string()))?;
            ranges.push(Range::try_new(begin, end)?);
        }
        Ok(RangeList::from(ranges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(b: i64, e: i64) -> Range {
        Range::new(b, e)
    }

    #[test]
    fn add_merges_adjacent() {
        let mut list = RangeList::from(vec![r(0, 9)]);
        list.add(r(10, 20));
        assert_eq!(list.as_slice(), &[r(0, 20)]);
    }

    #[test]
    fn add_keeps_gapped_separate() {
        let mut list = RangeList::from(vec![r(0, 9)]);
        list.add(r(11, 20));
        assert_eq!(list.as_slice(), &[r(0, 9), r(11, 20)]);
    }

    #[test]
    fn from_unsorted_normalizes_and_merges() {
        let list = RangeList::from(vec![r(20, 30), r(0, 10), r(11, 19)]);
        assert_eq!(list.as_slice(), &[r(0, 30)]);
    }

    #[test]
    fn union_and_intersection() {
        let full = RangeList::from(vec![r(0, 99)]);
        let middle = RangeList::from(vec![r(40, 59)]);
        assert_eq!(full.intersection(&middle).as_slice(), &[r(40, 59)]);

        let start = RangeList::from(vec![r(0, 9)]);
        let end = RangeList::from(vec![r(90, 99)]);
        assert!(start.intersection(&end).is_empty());

        let union = start.union(&end);
        assert_eq!(union.as_slice(), &[r(0, 9), r(90, 99)]);
    }

    #[test]
    fn difference_full_minus_start() {
        let full = RangeList::from(vec![r(0, 99)]);
        let start = RangeList::from(vec![r(0, 9)]);
        assert_eq!(full.difference(&start).as_slice(), &[r(10, 99)]);
    }

    #[test]
    fn remove_splits_a_range() {
        let mut list = RangeList::from(vec![r(0, 99)]);
        list.remove(&RangeList::from(vec![r(40, 59)]));
        assert_eq!(list.as_slice(), &[r(0, 39), r(60, 99)]);
    }

    #[test]
    fn remove_fully_consumed_range_drops_it() {
        let mut list = RangeList::from(vec![r(0, 9), r(20, 29)]);
        list.remove(&RangeList::from(vec![r(0, 9)]));
        assert_eq!(list.as_slice(), &[r(20, 29)]);
    }

    #[test]
    fn select_resources_greedy() {
        let list = RangeList::from(vec![r(0, 4), r(10, 19)]);
        let picked = list.select_resources(7).unwrap();
        assert_eq!(picked.as_slice(), &[r(0, 4), r(10, 11)]);
        assert_eq!(picked.num_items(), 7);
    }

    #[test]
    fn select_resources_insufficient_returns_none() {
        let list = RangeList::from(vec![r(0, 4)]);
        assert!(list.select_resources(10).is_none());
    }

    #[test]
    fn select_resources_zero_is_empty() {
        let list = RangeList::from(vec![r(0, 4)]);
        assert_eq!(list.select_resources(0).unwrap(), RangeList::new());
    }

    #[test]
    fn equals_is_content_equality() {
        let a = RangeList::from(vec![r(0, 9), r(20, 29)]);
        let b = RangeList::from(vec![r(20, 29), r(0, 9)]);
        assert_eq!(a, b);
    }

    #[test]
    fn lowest_highest_num_items() {
        let list = RangeList::from(vec![r(0, 9), r(20, 29)]);
        assert_eq!(list.lowest(), Some(0));
        assert_eq!(list.highest(), Some(29));
        assert_eq!(list.num_items(), 20);
    }

    #[test]
    fn parse_round_trip() {
        let list: RangeList = "{[0..9],[20..29]}".parse().unwrap();
        assert_eq!(list.as_slice(), &[r(0, 9), r(20, 29)]);
        assert_eq!(list.to_string(), "{[0..9],[20..29]}");
    }

    #[test]
    fn parse_unsorted_input_sorts_on_query() {
        let list: RangeList = "{[20..29],[0..9]}".parse().unwrap();
        assert_eq!(list.as_slice(), &[r(0, 9), r(20, 29)]);
    }

    #[test]
    fn parse_empty_braces() {
        let list: RangeList = "{}".parse().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn parse_malformed_is_error() {
        assert!("[0..9]".parse::<RangeList>().is_err());
        assert!("{[0..9}".parse::<RangeList>().is_err());
    }

    #[test]
    fn full_capacity_helper() {
        let list = RangeList::full_capacity(10);
        assert_eq!(list.as_slice(), &[r(0, 9)]);
        assert!(RangeList::full_capacity(0).is_empty());
    }

    #[test]
    fn contains_binary_search() {
        let list = RangeList::from(vec![r(0, 9), r(20, 29)]);
        assert!(list.contains(5));
        assert!(list.contains(25));
        assert!(!list.contains(15));
    }
}
