use crossterm::style::Color;
use rand::Rng;

use crate::geometry::{Geometry, Position};
use crate::platform::Renderer;

#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    position: Position,
    color: Color,
    eaten: bool,
}

impl Food {
    pub fn spawn<R: Rng>(geometry: &Geometry, rng: &mut R, color: Color) -> Self {
        Food::at(geometry.random_grid_position(rng), color)
    }

    pub fn at(position: Position, color: Color) -> Self {
        Food { position, color, eaten: false }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_eaten(&self) -> bool {
        self.eaten
    }

    pub fn mark_eaten(&mut self) {
        self.eaten = true;
    }

    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R, size: i32) {
        renderer.draw_square(self.position, size, self.color);
    }
}
