use std::collections::{HashSet, VecDeque};

use super::types::Point;

/// Snake body with the head at the front of the deque. A parallel cell set
/// keeps occupancy probes O(1).
#[derive(Clone, Debug)]
pub struct SnakeBody {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl SnakeBody {
    /// Spawns the initial three segments on the grid midline, head towards
    /// the spawn direction.
    pub fn spawn(grid_size: usize) -> Self {
        let mid = grid_size / 2;
        Self::from_segments_tail_first(vec![
            Point::new(mid - 1, mid),
            Point::new(mid, mid),
            Point::new(mid + 1, mid),
        ])
    }

    pub(crate) fn from_segments_tail_first(segments: Vec<Point>) -> Self {
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();
        for segment in segments {
            body.push_front(segment);
            body_set.insert(segment);
        }
        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: &Point) -> bool {
        self.body_set.contains(cell)
    }

    /// Head-first segment order.
    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    /// Moves the head to `new_head`. When not growing, the tail is vacated
    /// first, so a move onto the old tail cell keeps the occupancy set
    /// consistent.
    pub fn advance(&mut self, new_head: Point, grow: bool) {
        if !grow {
            let tail = self
                .body
                .pop_back()
                .expect("Snake body should never be empty");
            self.body_set.remove(&tail);
        }
        self.body.push_front(new_head);
        self.body_set.insert(new_head);
    }
}
