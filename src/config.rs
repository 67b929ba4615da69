use std::{convert::TryFrom, env, error, fmt, str::FromStr};

use crossterm::style::Color;
use log::LevelFilter;

pub const WHITE: Color = Color::Rgb { r: 255, g: 240, b: 200 };
pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
pub const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };

/// Apples add one segment in the simple game and five in the extended one.
pub const SIMPLE_GROWTH: usize = 1;
pub const EXTENDED_GROWTH: usize = 5;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    NonPositive { name: &'static str, value: i32 },
    Misaligned { name: &'static str, value: i32, cell_size: i32 },
    Zero(&'static str),
    SnakeTooLong { length: usize, columns: i32 },
    TooLarge(&'static str),
    InvalidValue { var: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { name, value } => {
                write!(f, "{} must be positive, got {}", name, value)
            }
            ConfigError::Misaligned { name, value, cell_size } => {
                write!(f, "{} ({}) is not a multiple of the cell size ({})", name, value, cell_size)
            }
            ConfigError::Zero(name) => write!(f, "{} must be at least 1", name),
            ConfigError::SnakeTooLong { length, columns } => write!(
                f,
                "a snake of length {} does not fit in the {} columns right of the center",
                length, columns
            ),
            ConfigError::TooLarge(name) => write!(f, "{} is too large", name),
            ConfigError::InvalidValue { var, value } => {
                write!(f, "cannot parse {}={:?}", var, value)
            }
        }
    }
}

impl error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Settings {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    pub initial_length: usize,
    /// Grid cells travelled per tick.
    pub speed_cells: i32,
    pub growth_batch: usize,
    pub tick_rate: u32,
    pub snake_color: Color,
    pub food_color: Color,
    pub background: Color,
    pub log_file: String,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 640,
            height: 640,
            cell_size: 10,
            initial_length: 3,
            speed_cells: 1,
            growth_batch: SIMPLE_GROWTH,
            tick_rate: 20,
            snake_color: WHITE,
            food_color: RED,
            background: BLACK,
            log_file: "snake.log".to_string(),
            log_level: LevelFilter::Debug,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds settings from the defaults, overriding every `SNAKE_*` variable
    /// that `lookup` knows about.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        // A variant only picks the growth preset, SNAKE_GROWTH still wins
        if let Some(variant) = lookup("SNAKE_VARIANT") {
            settings.growth_batch = match variant.trim() {
                "simple" => SIMPLE_GROWTH,
                "extended" => EXTENDED_GROWTH,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "SNAKE_VARIANT".to_string(),
                        value: variant.clone(),
                    })
                }
            };
        }

        override_with(&lookup, "SNAKE_WIDTH", &mut settings.width)?;
        override_with(&lookup, "SNAKE_HEIGHT", &mut settings.height)?;
        override_with(&lookup, "SNAKE_CELL_SIZE", &mut settings.cell_size)?;
        override_with(&lookup, "SNAKE_INITIAL_LENGTH", &mut settings.initial_length)?;
        override_with(&lookup, "SNAKE_SPEED", &mut settings.speed_cells)?;
        override_with(&lookup, "SNAKE_GROWTH", &mut settings.growth_batch)?;
        override_with(&lookup, "SNAKE_TICK_RATE", &mut settings.tick_rate)?;
        override_with(&lookup, "SNAKE_LOG_LEVEL", &mut settings.log_level)?;

        if let Some(path) = lookup("SNAKE_LOG") {
            settings.log_file = path;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Extents and alignment are checked by the board itself
        let geometry = crate::geometry::Geometry::new(self.width, self.height, self.cell_size)?;

        if self.initial_length == 0 {
            return Err(ConfigError::Zero("initial length"));
        }
        if self.growth_batch == 0 {
            return Err(ConfigError::Zero("growth batch"));
        }
        if self.speed_cells <= 0 {
            return Err(ConfigError::NonPositive { name: "speed", value: self.speed_cells });
        }
        // The head may step one move past the far edge before the crash is seen
        let speed = self.speed_cells.checked_mul(self.cell_size);
        if speed.and_then(|s| self.width.max(self.height).checked_add(s)).is_none() {
            return Err(ConfigError::TooLarge("speed"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::Zero("tick rate"));
        }

        let columns = (self.width - geometry.center().x) / self.cell_size;
        let fits = i32::try_from(self.initial_length).map_or(false, |length| length <= columns);
        if !fits {
            return Err(ConfigError::SnakeTooLong { length: self.initial_length, columns });
        }

        Ok(())
    }

    pub fn speed(&self) -> i32 {
        self.speed_cells * self.cell_size
    }
}

fn override_with<F, T>(lookup: &F, var: &str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(var) {
        *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.clone(),
        })?;
    }
    Ok(())
}
