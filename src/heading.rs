//! Circular heading arithmetic, heading ranges and heading sets.
//!
//! Headings are integer compass degrees in `[0, 360)`. A [`HeadingRange`] is
//! a clockwise arc from `min` to `max`; a [`HeadingSet`] is a sorted,
//! non-overlapping collection of such arcs around the compass.

use serde::Serialize;
use std::fmt;

/// Signed shortest difference from heading `a` to heading `b`, in
/// `(-180, 180]`. Positive when turning clockwise.
pub fn diff(a: i32, b: i32) -> i32 {
    let d = (b - a).rem_euclid(360);
    if d > 180 { d - 360 } else { d }
}

/// Clockwise distance from `min` to `max`, in `[0, 360)`.
pub fn dist(min: i32, max: i32) -> i32 {
    let d = diff(min, max);
    if d >= 0 { d } else { 360 + d }
}

/// Is heading `h` on the clockwise arc from `min` to `max` (inclusive)?
pub fn between(h: i32, min: i32, max: i32) -> bool {
    let min_diff = diff(h, min);
    let max_diff = diff(h, max);
    if dist(min, max) < 180 {
        min_diff <= 0 && max_diff >= 0
    } else {
        // wide arcs: test exclusion from the complementary minor arc
        !(min_diff > 0 && max_diff < 0)
    }
}

/// Add a signed offset `d` to heading `h`, normalized into `[0, 360)`.
pub fn add(h: i32, d: i32) -> i32 {
    (h + d).rem_euclid(360)
}

/// A clockwise arc of headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HeadingRange {
    /// Counter-clockwise extreme of the range
    pub min: i32,
    /// Angular mid-point, biased towards `min` on odd widths
    pub mid: i32,
    /// Clockwise extreme of the range
    pub max: i32,
    /// Width of the range in degrees
    pub variation: i32,
}

impl HeadingRange {
    pub fn new(min: i32, max: i32) -> Self {
        let variation = dist(min, max);
        Self {
            min,
            mid: add(min, variation / 2),
            max,
            variation,
        }
    }

    pub fn includes(&self, h: i32) -> bool {
        between(h, self.min, self.max)
    }

    /// True if any endpoint of either range lies within the other.
    pub fn overlaps(&self, other: &HeadingRange) -> bool {
        self.includes(other.min)
            || self.includes(other.max)
            || other.includes(self.min)
            || other.includes(self.max)
    }

    /// Smallest range covering both arcs, or `None` if they don't overlap.
    /// Ranges sharing a single endpoint are merged.
    pub fn merge(&self, other: &HeadingRange) -> Option<HeadingRange> {
        if !self.overlaps(other) {
            return None;
        }
        let mut min = self.min;
        let mut max = self.max;
        if between(min, other.min, other.max) {
            min = other.min;
        }
        if between(max, other.min, other.max) {
            max = other.max;
        }
        Some(HeadingRange::new(min, max))
    }

    /// Are both endpoints of this range on the arc from `min` to `max`?
    pub fn is_between(&self, min: i32, max: i32) -> bool {
        between(self.min, min, max) && between(self.max, min, max)
    }
}

impl fmt::Display for HeadingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.min, self.max)
    }
}

/// Discontinuous set of heading ranges sorted clockwise.
///
/// Adding a range merges it with every member it overlaps, so members never
/// overlap. The set is circular: the last and first members are neighbours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadingSet {
    ranges: Vec<HeadingRange>,
}

impl HeadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ranges(&self) -> &[HeadingRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeadingRange> {
        self.ranges.iter()
    }

    /// Insert `range`, merging it with all overlapping members.
    pub fn add(&mut self, range: HeadingRange) {
        if self.ranges.is_empty() {
            self.ranges.push(range);
            return;
        }
        let first = self.ranges[0];
        let mut pending = Some(range);
        let mut result = Vec::with_capacity(self.ranges.len() + 1);
        for next in &self.ranges {
            let Some(h) = pending else {
                result.push(*next);
                continue;
            };
            if let Some(merged) = next.merge(&h) {
                pending = Some(merged);
                continue;
            }
            if h.is_between(first.min, next.min) {
                result.push(h);
                pending = None;
            }
            result.push(*next);
        }
        if let Some(h) = pending {
            result.push(h);
        }
        // close the circle
        while result.len() > 1 {
            let last = result[result.len() - 1];
            match last.merge(&result[0]) {
                Some(merged) => {
                    result[0] = merged;
                    result.pop();
                }
                None => break,
            }
        }
        self.ranges = result;
    }

    /// The gaps between members, starting with the gap that wraps from the
    /// last member back to the first. Returns an empty set for an empty set.
    pub fn inverse(&self) -> HeadingSet {
        let (Some(first), Some(last)) = (self.ranges.first(), self.ranges.last()) else {
            return HeadingSet::new();
        };
        let mut ranges = vec![HeadingRange::new(last.max, first.min)];
        ranges.extend(
            self.ranges
                .windows(2)
                .map(|w| HeadingRange::new(w[0].max, w[1].min)),
        );
        HeadingSet { ranges }
    }

    /// Total degrees covered by the members.
    pub fn variation(&self) -> i32 {
        self.ranges.iter().map(|r| r.variation).sum()
    }
}

impl FromIterator<HeadingRange> for HeadingSet {
    fn from_iter<I: IntoIterator<Item = HeadingRange>>(iter: I) -> Self {
        let mut set = HeadingSet::new();
        for range in iter {
            set.add(range);
        }
        set
    }
}

impl<'a> IntoIterator for &'a HeadingSet {
    type Item = &'a HeadingRange;
    type IntoIter = std::slice::Iter<'a, HeadingRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl fmt::Display for HeadingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]({})", ranges.join(","), self.variation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalizes() {
        assert_eq!(add(350, 20), 10);
        assert_eq!(add(10, -20), 350);
        assert_eq!(add(0, 360), 0);
    }

    #[test]
    fn test_between_wide_arc() {
        // 20 -> 300 clockwise spans 280 degrees
        assert!(between(200, 20, 300));
        assert!(!between(330, 20, 300));
        assert!(between(20, 20, 300));
        assert!(between(300, 20, 300));
    }

    #[test]
    fn test_inverse_of_empty_set() {
        assert!(HeadingSet::new().inverse().is_empty());
    }
}
