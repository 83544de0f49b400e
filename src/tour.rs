use crate::cities::City;
use crate::error::MalformedTourError;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// The two neighbours of one city in a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub connection1: usize,
    pub connection2: usize,
}

impl Link {
    pub fn new(connection1: usize, connection2: usize) -> Self {
        Self {
            connection1,
            connection2,
        }
    }
}

/// A Hamiltonian cycle stored as one `Link` per city index.
///
/// The optimizer is expected to hand over a symmetric single cycle. Nothing
/// here trusts that: [`Tour::walk`] fails instead of looping on bad input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    links: Vec<Link>,
}

impl Tour {
    pub fn from_links(links: Vec<Link>) -> Self {
        Self { links }
    }

    /// Encodes a visiting order (a permutation of `0..n`) as neighbour pairs.
    /// `connection1` is the successor and `connection2` the predecessor.
    pub fn from_order(order: &[usize]) -> Self {
        let n = order.len();
        let mut links = vec![Link::new(0, 0); n];
        for (i, &city) in order.iter().enumerate() {
            let next = order[(i + 1) % n];
            let prev = order[(i + n - 1) % n];
            links[city] = Link::new(next, prev);
        }
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Lazily walks the cycle from `start`, yielding exactly `len()` cities.
    pub fn walk(&self, start: usize) -> Result<TourWalk<'_>, MalformedTourError> {
        TourWalk::new(self, start)
    }

    /// Collects a full walk from `start`.
    pub fn visit_order(&self, start: usize) -> Result<Vec<usize>, MalformedTourError> {
        self.walk(start)?.collect()
    }

    /// Closed length of the tour over `cities`.
    pub fn length(&self, cities: &[City]) -> Result<f64, MalformedTourError> {
        if cities.len() != self.len() {
            return Err(MalformedTourError::CityCountMismatch {
                tour_len: self.len(),
                city_count: cities.len(),
            });
        }
        Ok(closed_length(&self.visit_order(0)?, cities))
    }
}

impl Index<usize> for Tour {
    type Output = Link;

    fn index(&self, city: usize) -> &Link {
        &self.links[city]
    }
}

/// Closed length of a visiting order, including the edge back to the start.
pub fn closed_length(order: &[usize], cities: &[City]) -> f64 {
    let n = order.len();
    if n < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..n - 1 {
        total += cities[order[i]].distance(&cities[order[i + 1]]);
    }
    total + cities[order[n - 1]].distance(&cities[order[0]])
}

/// One pass over a tour. Not restartable: build a new walk to go again.
///
/// Advancing from `current` takes whichever neighbour is not `previous`,
/// checking `connection1` first. That tie-break is arbitrary but fixed.
/// After the first error the walk is finished.
pub struct TourWalk<'a> {
    tour: &'a Tour,
    previous: usize,
    current: usize,
    emitted: usize,
    visited: Vec<bool>,
    failed: bool,
}

impl<'a> TourWalk<'a> {
    fn new(tour: &'a Tour, start: usize) -> Result<Self, MalformedTourError> {
        if tour.is_empty() {
            return Err(MalformedTourError::Empty);
        }
        let len = tour.len();
        if start >= len {
            return Err(MalformedTourError::StartOutOfRange { start, len });
        }

        Ok(Self {
            tour,
            previous: start,
            current: start,
            emitted: 0,
            visited: vec![false; len],
            failed: false,
        })
    }

    fn check_neighbor(&self, city: usize, neighbor: usize) -> Result<usize, MalformedTourError> {
        let len = self.tour.len();
        if neighbor >= len {
            return Err(MalformedTourError::NeighborOutOfRange {
                city,
                neighbor,
                len,
            });
        }
        if neighbor == city {
            return Err(MalformedTourError::SelfLoop { city });
        }
        Ok(neighbor)
    }

    fn next_city(&self) -> Result<usize, MalformedTourError> {
        let city = self.current;
        let link = self.tour[city];

        // First step: leave the start through connection1.
        if self.emitted == 1 {
            return self.check_neighbor(city, link.connection1);
        }

        let previous = self.previous;
        let next = match (link.connection1 == previous, link.connection2 == previous) {
            (true, true) => return Err(MalformedTourError::DuplicateEdge { city, previous }),
            (false, false) => return Err(MalformedTourError::BrokenSymmetry { city, previous }),
            (false, true) => link.connection1,
            (true, false) => link.connection2,
        };
        self.check_neighbor(city, next)
    }
}

impl Iterator for TourWalk<'_> {
    type Item = Result<usize, MalformedTourError>;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.tour.len();
        if self.failed || self.emitted >= len {
            return None;
        }

        if self.emitted > 0 {
            let next = match self.next_city() {
                Ok(next) => next,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };
            if self.visited[next] {
                self.failed = true;
                return Some(Err(MalformedTourError::SubCycle {
                    city: next,
                    visited: self.emitted,
                    len,
                }));
            }
            self.previous = self.current;
            self.current = next;
        }

        self.visited[self.current] = true;
        self.emitted += 1;
        Some(Ok(self.current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.tour.len() - self.emitted;
        (0, Some(remaining))
    }
}

impl std::iter::FusedIterator for TourWalk<'_> {}
