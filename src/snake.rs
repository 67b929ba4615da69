use crossterm::style::Color;
use Direction::*;

use crate::food::Food;
use crate::geometry::Position;
use crate::platform::Renderer;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Left => Right,
            Up => Down,
            Right => Left,
            Down => Up,
        }
    }

    fn delta(self, speed: i32) -> (i32, i32) {
        match self {
            Left => (-speed, 0),
            Up => (0, -speed),
            Right => (speed, 0),
            Down => (0, speed),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnakeSegment {
    pub position: Position,
    pub color: Color,
}

/// Index 0 of `body` is the head. The body is never empty.
pub struct Snake {
    body: Vec<SnakeSegment>,
    direction: Direction,
    color: Color,
    part_size: i32,
    speed: i32,
}

impl Snake {
    /// Lays the snake out as a horizontal line with the head on the left,
    /// heading left. `initial_length` is clamped to at least 1.
    pub fn new(start: Position, color: Color, initial_length: usize, part_size: i32) -> Self {
        let body = (0..initial_length.max(1) as i32)
            .map(|i| SnakeSegment { position: start.offset(i * part_size, 0), color })
            .collect();

        Snake { body, direction: Left, color, part_size, speed: part_size }
    }

    /// Moves `speed` units per tick instead of one cell.
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn segments(&self) -> &[SnakeSegment] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn head_position(&self) -> Position {
        self.body[0].position
    }

    fn tail_position(&self) -> Position {
        self.body[self.body.len() - 1].position
    }

    /// Returns whether the direction changed. Reversing is ignored.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.direction.opposite() || requested == self.direction {
            return false;
        }

        self.direction = requested;
        true
    }

    pub fn move_step(&mut self) {
        for i in (1..self.body.len()).rev() {
            self.body[i].position = self.body[i - 1].position;
        }

        let (dx, dy) = self.direction.delta(self.speed);
        let head = &mut self.body[0].position;
        *head = head.offset(dx, dy);
    }

    /// New segments stack on the tail and get pulled out over the next moves.
    pub fn grow(&mut self, batch: usize) {
        let tail = SnakeSegment { position: self.tail_position(), color: self.color };
        self.body.extend(std::iter::repeat(tail).take(batch));
    }

    pub fn check_self_collision(&self) -> bool {
        let head = self.head_position();
        self.body[1..].iter().any(|segment| segment.position == head)
    }

    /// Eats `food` if the head is on it, growing by `batch`.
    pub fn eat(&mut self, food: &mut Food, batch: usize) -> bool {
        if food.is_eaten() || self.head_position() != food.position() {
            return false;
        }

        food.mark_eaten();
        self.grow(batch);
        true
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for segment in self.segments() {
            renderer.draw_square(segment.position, self.part_size, segment.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RED, WHITE};

    fn snake_at(x: i32, y: i32, length: usize) -> Snake {
        Snake::new(Position::new(x, y), WHITE, length, 10)
    }

    fn positions(snake: &Snake) -> Vec<Position> {
        snake.segments().iter().map(|s| s.position).collect()
    }

    #[test]
    fn starts_as_a_horizontal_line_heading_left() {
        let snake = snake_at(320, 320, 3);

        assert_eq!(snake.direction(), Left);
        assert_eq!(
            positions(&snake),
            vec![Position::new(320, 320), Position::new(330, 320), Position::new(340, 320)]
        );
        assert_eq!(snake.head_position(), Position::new(320, 320));
        assert!(!snake.check_self_collision());
    }

    #[test]
    fn head_position_uses_one_segment() {
        let mut snake = snake_at(100, 100, 3);
        snake.set_direction(Up);
        snake.move_step();

        // Segment 1 is at y = 100; the head must report its own y
        assert_eq!(snake.head_position(), Position::new(100, 90));
    }

    #[test]
    fn opposites_pair_up() {
        for &d in &[Left, Up, Right, Down] {
            assert_ne!(d.opposite(), d);
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn reversal_is_rejected() {
        for &d1 in &[Left, Up, Right, Down] {
            let mut snake = snake_at(100, 100, 3);
            if d1 != snake.direction().opposite() {
                snake.set_direction(d1);
            } else {
                snake.set_direction(Up);
                snake.set_direction(d1);
            }
            assert_eq!(snake.direction(), d1);

            assert!(!snake.set_direction(d1.opposite()));
            assert_eq!(snake.direction(), d1);
        }
    }

    #[test]
    fn move_shifts_the_whole_body() {
        for &dir in &[Up, Down, Left] {
            let mut snake = snake_at(200, 200, 5);
            snake.set_direction(dir);
            let before = positions(&snake);

            snake.move_step();
            let after = positions(&snake);

            for i in 1..after.len() {
                assert_eq!(after[i], before[i - 1]);
            }
            let (dx, dy) = dir.delta(10);
            assert_eq!(after[0], before[0].offset(dx, dy));
        }
    }

    #[test]
    fn speed_is_applied_to_the_head() {
        let mut snake = snake_at(200, 200, 2).with_speed(20);
        snake.move_step();
        assert_eq!(snake.head_position(), Position::new(180, 200));
        assert_eq!(snake.segments()[1].position, Position::new(200, 200));
    }

    #[test]
    fn grow_stacks_segments_on_the_tail() {
        let mut snake = snake_at(100, 100, 3);
        let tail = Position::new(120, 100);

        snake.grow(5);

        assert_eq!(snake.len(), 8);
        assert!(snake.segments()[3..].iter().all(|s| s.position == tail));

        // The stacked segments are pulled out one by one
        snake.move_step();
        let xs: Vec<i32> = positions(&snake).iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![90, 100, 110, 120, 120, 120, 120, 120]);
    }

    #[test]
    fn eats_only_when_the_head_is_on_the_food() {
        let mut snake = snake_at(100, 100, 3);

        let mut elsewhere = Food::at(Position::new(110, 100), RED);
        assert!(!snake.eat(&mut elsewhere, 1));
        assert!(!elsewhere.is_eaten());
        assert_eq!(snake.len(), 3);

        let mut apple = Food::at(Position::new(100, 100), RED);
        assert!(snake.eat(&mut apple, 5));
        assert!(apple.is_eaten());
        assert_eq!(snake.len(), 8);

        // Already eaten
        assert!(!snake.eat(&mut apple, 5));
        assert_eq!(snake.len(), 8);
    }

    #[test]
    fn turning_into_the_body_collides() {
        let mut snake = snake_at(100, 100, 5);

        for &dir in &[Up, Right, Down] {
            assert!(!snake.check_self_collision());
            snake.set_direction(dir);
            snake.move_step();
        }

        assert_eq!(snake.head_position(), Position::new(110, 100));
        assert!(snake.check_self_collision());
    }

    #[test]
    fn collision_needs_both_axes_to_match() {
        let mut snake = snake_at(100, 100, 4);
        snake.set_direction(Up);
        snake.move_step();
        snake.set_direction(Right);
        snake.move_step();

        // Head shares x with one segment and y with another, but no cell
        assert_eq!(snake.head_position(), Position::new(110, 90));
        assert!(!snake.check_self_collision());
    }
}
