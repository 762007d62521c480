use std::ops::Not;
use std::str::FromStr;

mod config;

pub use config::*;

/// Represents one of the two sides of the clock.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, strum::Display, strum::EnumIter)]
#[repr(u8)]
pub enum Player {
    #[strum(serialize = "0")]
    First = 0,
    #[strum(serialize = "1")]
    Second = 1,
}

impl Player {
    /// Returns the index of the player into per-player arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }
}

impl Not for Player {
    type Output = Self;

    /// Returns the opponent.
    fn not(self) -> Self::Output {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("invalid player '{0}', expected 0 or 1")]
pub struct ParsePlayerError(pub String);

impl FromStr for Player {
    type Err = ParsePlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(Player::from_index)
            .ok_or_else(|| ParsePlayerError(s.to_string()))
    }
}
