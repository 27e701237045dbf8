//! Text command mapping for the line-based driver.

use std::str::FromStr;

use dungeon::Direction;

/// A command typed by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Help,
    Quit,
}

impl Command {
    /// Row/column delta for movement commands
    pub fn delta(self) -> Option<(i32, i32)> {
        match self {
            Command::Move(direction) => Some(direction.delta()),
            _ => None,
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_ascii_lowercase().as_str() {
            "w" | "up" => Command::Move(Direction::North),
            "s" | "down" => Command::Move(Direction::South),
            "a" | "left" => Command::Move(Direction::West),
            "d" | "right" => Command::Move(Direction::East),
            "h" | "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {other:?}")),
        };
        Ok(command)
    }
}

pub const HELP: &str = "w/up  s/down  a/left  d/right  move or attack\nh     help\nq     quit";
