use raffle_shared::TicketNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Inclusive block of ticket numbers, e.g. 121-140
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRange {
    pub start: u32,
    pub end: u32,
}

impl TicketRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    fn overlaps(&self, other: &TicketRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for TicketRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The fixed universe of allocatable ticket numbers.
///
/// Built once at startup from the configured ranges and never mutated.
/// `all_numbers` keeps configuration order; membership is a hash lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    ranges: Vec<TicketRange>,
    numbers: Vec<TicketNumber>,
    index: HashSet<TicketNumber>,
}

impl Catalog {
    pub fn new(ranges: Vec<TicketRange>) -> Result<Self, CatalogError> {
        if ranges.is_empty() {
            return Err(CatalogError::Empty);
        }

        for range in &ranges {
            if range.start > range.end {
                return Err(CatalogError::InvertedRange {
                    start: range.start,
                    end: range.end,
                });
            }
        }

        for (i, a) in ranges.iter().enumerate() {
            if let Some(b) = ranges[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(CatalogError::Overlap { first: *a, second: *b });
            }
        }

        let numbers: Vec<TicketNumber> = ranges
            .iter()
            .flat_map(|r| (r.start..=r.end).map(TicketNumber))
            .collect();
        let index = numbers.iter().copied().collect();

        Ok(Self { ranges, numbers, index })
    }

    /// Every ticket number, in configured range order
    pub fn all_numbers(&self) -> &[TicketNumber] {
        &self.numbers
    }

    pub fn contains(&self, number: TicketNumber) -> bool {
        self.index.contains(&number)
    }

    pub fn ranges(&self) -> &[TicketRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("No ticket ranges configured")]
    Empty,

    #[error("Invalid ticket range {start}-{end}: start is after end")]
    InvertedRange {
        start: u32,
        end: u32,
    },

    #[error("Ticket ranges {first} and {second} overlap")]
    Overlap {
        first: TicketRange,
        second: TicketRange,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raffle_ranges() -> Vec<TicketRange> {
        vec![
            TicketRange::new(121, 140),
            TicketRange::new(1561, 1580),
            TicketRange::new(1586, 1605),
            TicketRange::new(1696, 1715),
            TicketRange::new(1771, 1790),
            TicketRange::new(2036, 2060),
        ]
    }

    #[test]
    fn test_catalog_follows_configured_order() {
        let catalog = Catalog::new(vec![
            TicketRange::new(1561, 1563),
            TicketRange::new(121, 122),
        ])
        .unwrap();

        let numbers: Vec<u32> = catalog.all_numbers().iter().map(|n| n.value()).collect();
        assert_eq!(numbers, vec![1561, 1562, 1563, 121, 122]);
    }

    #[test]
    fn test_catalog_size() {
        let catalog = Catalog::new(raffle_ranges()).unwrap();
        assert_eq!(catalog.len(), 20 * 5 + 25);
        assert!(catalog.contains(TicketNumber(2060)));
        assert!(!catalog.contains(TicketNumber(141)));
        assert!(!catalog.contains(TicketNumber(1581)));
    }

    #[test]
    fn test_single_number_range() {
        let catalog = Catalog::new(vec![TicketRange::new(7, 7)]).unwrap();
        assert_eq!(catalog.all_numbers(), &[TicketNumber(7)]);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert_eq!(Catalog::new(vec![]).unwrap_err(), CatalogError::Empty);
        assert_eq!(
            Catalog::new(vec![TicketRange::new(10, 5)]).unwrap_err(),
            CatalogError::InvertedRange { start: 10, end: 5 }
        );
        assert!(matches!(
            Catalog::new(vec![TicketRange::new(1, 10), TicketRange::new(10, 20)]),
            Err(CatalogError::Overlap { .. })
        ));
    }

    fn disjoint_ranges() -> impl Strategy<Value = Vec<TicketRange>> {
        // Non-overlapping by construction: each range starts past the previous end.
        prop::collection::vec((0u32..50, 0u32..30), 1..8).prop_map(|parts| {
            let mut cursor = 0;
            parts
                .into_iter()
                .map(|(gap, width)| {
                    let start = cursor + gap;
                    let end = start + width;
                    cursor = end + 1;
                    TicketRange::new(start, end)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn every_configured_number_appears_once(ranges in disjoint_ranges()) {
            let catalog = Catalog::new(ranges.clone()).unwrap();
            let expected: usize = ranges.iter().map(|r| r.len()).sum();
            prop_assert_eq!(catalog.len(), expected);

            for range in &ranges {
                for n in range.start..=range.end {
                    let hits = catalog.all_numbers().iter().filter(|x| x.value() == n).count();
                    prop_assert_eq!(hits, 1);
                    prop_assert!(catalog.contains(TicketNumber(n)));
                }
            }
        }

        #[test]
        fn numbers_outside_ranges_are_excluded(ranges in disjoint_ranges(), probe in 0u32..800) {
            let catalog = Catalog::new(ranges.clone()).unwrap();
            let inside = ranges.iter().any(|r| r.start <= probe && probe <= r.end);
            prop_assert_eq!(catalog.contains(TicketNumber(probe)), inside);
        }
    }
}
