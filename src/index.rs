//! Tolerance-bucketed spatial index over segment endpoints
//!
//! Matching endpoints within a tolerance naively is O(n²); bucketing every
//! endpoint into an ε-sized grid cell keeps each lookup local. Two points
//! within ε of each other can still land in different cells when they
//! straddle a cell edge, so queries always scan the 3×3 neighborhood around
//! the query point's own cell.

use geo::Coord;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Which endpoint of a segment a bucket entry refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum EndpointKind {
    Start,
    End,
}

type BucketKey = (i64, i64);

/// Candidate entries returned by a neighborhood query
pub(crate) type Candidates = SmallVec<[(usize, EndpointKind); 8]>;

/// Hash-grid index from ε-sized buckets to the segment endpoints inside them
///
/// Scoped to a single stitching pass and discarded afterwards. Single writer;
/// not thread safe.
#[derive(Debug)]
pub(crate) struct EndpointIndex {
    buckets: HashMap<BucketKey, Vec<(usize, EndpointKind)>>,
    eps: f64,
}

impl EndpointIndex {
    /// Build the index over `(start, end)` endpoint pairs; the position of a
    /// pair in the iterator is its segment id.
    pub fn build(endpoints: impl IntoIterator<Item = (Coord<f64>, Coord<f64>)>, eps: f64) -> Self {
        let mut index = Self {
            buckets: HashMap::new(),
            eps,
        };
        for (id, (start, end)) in endpoints.into_iter().enumerate() {
            index.insert(id, start, EndpointKind::Start);
            index.insert(id, end, EndpointKind::End);
        }
        index
    }

    fn key(&self, point: Coord<f64>) -> BucketKey {
        (
            (point.x / self.eps).floor() as i64,
            (point.y / self.eps).floor() as i64,
        )
    }

    /// Insert one endpoint entry into its bucket
    pub fn insert(&mut self, id: usize, point: Coord<f64>, kind: EndpointKind) {
        self.buckets
            .entry(self.key(point))
            .or_default()
            .push((id, kind));
    }

    /// Remove every entry for `id` from the bucket holding `point`, dropping
    /// the bucket once empty. After removal no `neighbors` call returns the
    /// segment's entries for that bucket again.
    pub fn remove(&mut self, id: usize, point: Coord<f64>) {
        let key = self.key(point);
        if let Some(entries) = self.buckets.get_mut(&key) {
            entries.retain(|&(entry_id, _)| entry_id != id);
            if entries.is_empty() {
                self.buckets.remove(&key);
            }
        }
    }

    /// All entries in the point's own bucket and its 8 surrounding buckets,
    /// sorted by ascending segment id so candidate selection is deterministic
    pub fn neighbors(&self, point: Coord<f64>) -> Candidates {
        let (cx, cy) = self.key(point);
        let mut found = Candidates::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(entries) = self.buckets.get(&(cx + dx, cy + dy)) {
                    found.extend_from_slice(entries);
                }
            }
        }
        found.sort_unstable();
        found
    }

    /// Number of non-empty buckets currently held
    #[cfg(test)]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
