use log::{debug, info};
use rand::Rng;

use crate::config::Settings;
use crate::food::Food;
use crate::geometry::Geometry;
use crate::platform::{Clock, Event, InputSource, Key, Renderer};
use crate::snake::{Direction, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    SelfCollision,
    OutOfBounds,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    Running,
    Quit,
    GameOver(Crash),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Crashed(Crash),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub score: u64,
    pub length: usize,
    pub ticks: u64,
}

/// Owns the snake and the food and drives them one tick at a time.
pub struct SnakeGame<T, G> {
    settings: Settings,
    geometry: Geometry,
    snake: Snake,
    food: Food,
    shell: T,
    rng: G,
    score: u64,
    ticks: u64,
    over: Option<Outcome>,
}

impl<T, G> SnakeGame<T, G>
where
    T: Renderer + InputSource,
    G: Rng,
{
    pub fn new(settings: Settings, geometry: Geometry, shell: T, mut rng: G) -> Self {
        let snake = Snake::new(
            geometry.center(),
            settings.snake_color,
            settings.initial_length,
            geometry.cell_size(),
        )
        .with_speed(settings.speed());
        let food = Food::spawn(&geometry, &mut rng, settings.food_color);

        SnakeGame { settings, geometry, snake, food, shell, rng, score: 0, ticks: 0, over: None }
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> &Food {
        &self.food
    }

    #[cfg(test)]
    pub fn shell(&self) -> &T {
        &self.shell
    }

    #[cfg(test)]
    pub fn is_over(&self) -> bool {
        self.over.is_some()
    }

    /// Moves the apple, mostly for setting up scenarios.
    #[cfg(test)]
    pub fn place_food(&mut self, food: Food) {
        self.food = food;
    }

    pub fn play<C: Clock>(&mut self, clock: &mut C) -> crossterm::Result<GameSummary> {
        info!(
            "Starting on a {}x{} board, moving {} and growing {} per apple at {} Hz",
            self.geometry.width(),
            self.geometry.height(),
            self.snake.speed(),
            self.settings.growth_batch,
            self.settings.tick_rate
        );

        self.shell.clear(self.settings.background);

        let outcome = loop {
            clock.tick(self.settings.tick_rate);

            match self.tick()? {
                TickResult::Running => {}
                TickResult::Quit => break Outcome::Quit,
                TickResult::GameOver(crash) => break Outcome::Crashed(crash),
            }
        };

        let summary = self.summary(outcome);
        info!("Game ended: {:?}", summary);
        Ok(summary)
    }

    pub fn tick(&mut self) -> crossterm::Result<TickResult> {
        if let Some(outcome) = self.over {
            return Ok(match outcome {
                Outcome::Quit => TickResult::Quit,
                Outcome::Crashed(crash) => TickResult::GameOver(crash),
            });
        }

        self.ticks += 1;

        let turn = match self.read_input()? {
            Some(turn) => turn,
            None => {
                self.over = Some(Outcome::Quit);
                return Ok(TickResult::Quit);
            }
        };
        if let Some(dir) = turn {
            if self.snake.set_direction(dir) {
                debug!("Turned {:?} at {:?}", dir, self.snake.head_position());
            }
        }

        // Eating is checked where the head is now, before it moves on
        if self.snake.eat(&mut self.food, self.settings.growth_batch) {
            self.score += 1;
            debug!(
                "Ate apple at {:?}, length is now {}",
                self.food.position(),
                self.snake.len()
            );
            self.food = Food::spawn(&self.geometry, &mut self.rng, self.settings.food_color);
        }

        self.snake.move_step();

        if let Some(crash) = self.crash() {
            self.over = Some(Outcome::Crashed(crash));
            return Ok(TickResult::GameOver(crash));
        }

        self.food.draw(&mut self.shell, self.geometry.cell_size());
        self.snake.draw(&mut self.shell);
        self.shell.present()?;
        self.shell.clear(self.settings.background);

        Ok(TickResult::Running)
    }

    pub fn summary(&self, outcome: Outcome) -> GameSummary {
        GameSummary { outcome, score: self.score, length: self.snake.len(), ticks: self.ticks }
    }

    pub fn into_shell(self) -> T {
        self.shell
    }

    ///////////////////////////////////////////////////////////////////////////

    /// `None` means quit. Otherwise the last direction that isn't a reversal
    /// of the one the snake had when the tick started.
    fn read_input(&mut self) -> crossterm::Result<Option<Option<Direction>>> {
        let current = self.snake.direction();
        let mut turn = None;

        for ev in self.shell.poll_events()? {
            let dir = match ev {
                Event::Quit | Event::KeyUp(Key::Escape) => return Ok(None),
                Event::KeyUp(Key::Left) => Direction::Left,
                Event::KeyUp(Key::Right) => Direction::Right,
                Event::KeyUp(Key::Up) => Direction::Up,
                Event::KeyUp(Key::Down) => Direction::Down,
            };

            if dir != current.opposite() {
                turn = Some(dir);
            }
        }

        Ok(Some(turn))
    }

    fn crash(&self) -> Option<Crash> {
        if self.snake.check_self_collision() {
            Some(Crash::SelfCollision)
        } else if !self.geometry.in_bounds(self.snake.head_position()) {
            Some(Crash::OutOfBounds)
        } else {
            None
        }
    }
}
