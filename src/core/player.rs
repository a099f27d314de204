//! Player identification and per-player data storage.
//!
//! This is strictly a two-player game: `PlayerId` is a closed enum rather
//! than an index, so `opponent()` is total and keyword/combat code never
//! has to reason about "the other players".

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// The player who goes first.
    One,
    /// The player who goes second.
    Two,
}

impl PlayerId {
    /// Both players, in seating order.
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Zero-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Per-player data storage with O(1) access, indexed by [`PlayerId`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    data: [T; 2],
}

impl<T> PerPlayer<T> {
    /// Create from a factory invoked once per player.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::One), factory(PlayerId::Two)],
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over `(PlayerId, &T)` pairs in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::BOTH.iter().map(move |&p| (p, self.get(p)))
    }
}

impl<T: Default> Default for PerPlayer<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<PlayerId> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
