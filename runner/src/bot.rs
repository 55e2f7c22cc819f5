use snake_engine::{Direction, GameSnapshot, Point};

/// Greedy steering for unattended runs: among the legal moves, prefer the
/// one that closes the Manhattan distance to the food; otherwise take any
/// safe move.
pub struct AutoPilot;

impl AutoPilot {
    pub fn choose(snapshot: &GameSnapshot, grid_size: usize) -> Option<Direction> {
        let head = snapshot.snake.first().copied()?;

        let mut best: Option<(Direction, usize)> = None;
        let mut fallback = None;
        for direction in Self::candidate_directions(snapshot.direction) {
            let Some(next) = Self::step(head, direction, grid_size) else {
                continue;
            };
            if !Self::is_safe(next, snapshot) {
                continue;
            }
            if fallback.is_none() {
                fallback = Some(direction);
            }
            if let Some(food) = snapshot.food {
                let distance = manhattan(next, food);
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((direction, distance));
                }
            }
        }
        best.map(|(direction, _)| direction).or(fallback)
    }

    fn candidate_directions(current: Direction) -> Vec<Direction> {
        vec![
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
        .into_iter()
        .filter(|d| !d.is_opposite(&current))
        .collect()
    }

    fn step(head: Point, direction: Direction, grid_size: usize) -> Option<Point> {
        match direction {
            Direction::Up if head.y > 0 => Some(Point::new(head.x, head.y - 1)),
            Direction::Down if head.y + 1 < grid_size => Some(Point::new(head.x, head.y + 1)),
            Direction::Left if head.x > 0 => Some(Point::new(head.x - 1, head.y)),
            Direction::Right if head.x + 1 < grid_size => Some(Point::new(head.x + 1, head.y)),
            _ => None,
        }
    }

    fn is_safe(next: Point, snapshot: &GameSnapshot) -> bool {
        let tail = snapshot.snake.last().copied();
        let grows = snapshot.food == Some(next);
        !snapshot.snake.contains(&next) || (!grows && Some(next) == tail)
    }
}

fn manhattan(a: Point, b: Point) -> usize {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}
