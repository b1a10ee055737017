//! Spontaneous ignition markers
//!
//! The engine records where fires started on their own. Presentation layers age
//! the markers once per displayed frame and drop them after a fixed number of
//! frames; the engine itself never reads the log.

use crate::core_types::Coordinate;
use rustc_hash::FxHashMap;

/// Coordinates of spontaneous ignitions and how many frames each has been shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnitionEventLog {
    ages: FxHashMap<Coordinate, u32>,
}

impl IgnitionEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an ignition; an existing marker at the same cell restarts at age 0
    pub fn record(&mut self, coord: Coordinate) {
        self.ages.insert(coord, 0);
    }

    /// Record a batch of ignitions
    pub fn record_all<I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        for coord in coords {
            self.record(coord);
        }
    }

    /// Advance every marker by one frame and remove those that reached `display_length`
    ///
    /// Returns the removed coordinates in raster order.
    pub fn age_and_evict(&mut self, display_length: u32) -> Vec<Coordinate> {
        let mut evicted = Vec::new();
        self.ages.retain(|coord, age| {
            *age = age.saturating_add(1);
            if *age >= display_length {
                evicted.push(*coord);
                false
            } else {
                true
            }
        });
        evicted.sort_unstable();
        evicted
    }

    /// Current markers and their ages, in raster order
    pub fn markers(&self) -> Vec<(Coordinate, u32)> {
        let mut markers: Vec<_> = self.ages.iter().map(|(c, a)| (*c, *a)).collect();
        markers.sort_unstable();
        markers
    }

    pub fn age_of(&self, coord: Coordinate) -> Option<u32> {
        self.ages.get(&coord).copied()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.ages.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn clear(&mut self) {
        self.ages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_resets_age() {
        let mut log = IgnitionEventLog::new();
        let c = Coordinate::new(4, 2);
        log.record(c);
        log.age_and_evict(5);
        log.age_and_evict(5);
        assert_eq!(log.age_of(c), Some(2));
        log.record(c);
        assert_eq!(log.age_of(c), Some(0));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_markers_evicted_after_display_length() {
        let mut log = IgnitionEventLog::new();
        let a = Coordinate::new(1, 1);
        let b = Coordinate::new(0, 3);
        log.record(a);
        for _ in 0..2 {
            assert!(log.age_and_evict(5).is_empty());
        }
        log.record(b);
        assert!(log.age_and_evict(5).is_empty());
        assert!(log.age_and_evict(5).is_empty());
        assert_eq!(log.age_and_evict(5), vec![a]);
        assert!(log.contains(b));
        assert_eq!(log.age_and_evict(5), Vec::<Coordinate>::new());
        assert_eq!(log.age_and_evict(5), vec![b]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_markers_sorted_row_major() {
        let mut log = IgnitionEventLog::new();
        log.record_all([
            Coordinate::new(5, 1),
            Coordinate::new(0, 2),
            Coordinate::new(2, 1),
        ]);
        let coords: Vec<_> = log.markers().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(2, 1),
                Coordinate::new(5, 1),
                Coordinate::new(0, 2)
            ]
        );
    }
}
