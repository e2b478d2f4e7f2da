//! Playback over a replay.
//!
//! The cursor ranges over `[0, len)` at half-move granularity, where 0 is
//! the initial board. It keeps its own working grid seeded with both start
//! rectangles.
//!
//! ## Costs
//!
//! | Operation         | Cost        |
//! |-------------------|-------------|
//! | `next`/`previous` | one move    |
//! | `to_beginning`    | reseed      |
//! | `show_move(i)`    | `i` moves   |
//! | `to_end`          | `len` moves |
//!
//! Recorded placements never overlap, so undoing one clears exactly the
//! cells it claimed.

use super::snapshot::Replay;
use crate::core::{Cell, Move, Participant, PerPlayer, Rect};
use crate::map::{TerritoryMap, TerritoryView};

/// A position within a replay plus the board at that position.
#[derive(Clone, Debug)]
pub struct PlaybackCursor<'a> {
    replay: &'a Replay,
    position: usize,
    grid: TerritoryMap,
    areas: PerPlayer<u32>,
}

impl<'a> PlaybackCursor<'a> {
    /// Cursor on the initial board.
    #[must_use]
    pub fn new(replay: &'a Replay) -> Self {
        let initial = replay.initial_map();
        Self {
            replay,
            position: 0,
            grid: initial.grid().clone(),
            areas: initial.areas(),
        }
    }

    /// The replay being played back.
    #[must_use]
    pub fn replay(&self) -> &'a Replay {
        self.replay
    }

    /// Current half-move index.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Largest reachable index.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.replay.len().saturating_sub(1)
    }

    /// The move shown at the current position (`Move::EMPTY` at 0).
    #[must_use]
    pub fn current_move(&self) -> Move {
        self.replay.get(self.position).unwrap_or(Move::EMPTY)
    }

    /// Claimed cells per participant at the current position.
    #[must_use]
    pub fn areas(&self) -> PerPlayer<u32> {
        self.areas
    }

    /// Step forward one half-move. Returns false at the end.
    pub fn next(&mut self) -> bool {
        if self.position >= self.last_index() {
            return false;
        }
        self.position += 1;
        self.apply(self.current_move());
        true
    }

    /// Step back one half-move. Returns false at the beginning.
    pub fn previous(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.undo(self.current_move());
        self.position -= 1;
        true
    }

    /// Rebuild the board at `index`, clamped to `[0, last_index]`.
    pub fn show_move(&mut self, index: usize) {
        let target = index.min(self.last_index());
        self.to_beginning();
        while self.position < target {
            self.position += 1;
            self.apply(self.current_move());
        }
    }

    /// Jump to `index`, clamped to `[0, last_index]`.
    pub fn goto(&mut self, index: usize) {
        self.show_move(index);
    }

    /// Jump to a participant's half of a full move.
    ///
    /// Full move `n` consists of the creator's half-move `2n - 1` and the
    /// client's half-move `2n`. Out-of-range targets are clamped.
    pub fn goto_full_move(&mut self, number: u32, player: Participant) {
        let target = u64::from(number) * 2;
        let target = match player {
            Participant::Creator => target.saturating_sub(1),
            Participant::Client => target,
        };
        self.goto(usize::try_from(target).unwrap_or(usize::MAX));
    }

    /// Reset to the initial board.
    pub fn to_beginning(&mut self) {
        let initial = self.replay.initial_map();
        self.grid.clone_from(initial.grid());
        self.areas = initial.areas();
        self.position = 0;
    }

    /// Jump to the final board.
    pub fn to_end(&mut self) {
        self.show_move(self.last_index());
    }

    fn apply(&mut self, m: Move) {
        if let Some((player, rect)) = placement(&m) {
            self.areas[player] += self.grid.fill(rect, player.cell());
        }
    }

    fn undo(&mut self, m: Move) {
        if let Some((player, rect)) = placement(&m) {
            let cleared = self.grid.fill(rect, Cell::Empty);
            self.areas[player] = self.areas[player].saturating_sub(cleared);
        }
    }
}

fn placement(m: &Move) -> Option<(Participant, Rect)> {
    if m.skipped || m.rect.is_degenerate() {
        return None;
    }
    m.player.map(|player| (player, m.rect))
}

impl TerritoryView for PlaybackCursor<'_> {
    fn grid(&self) -> &TerritoryMap {
        &self.grid
    }

    fn area(&self, player: Participant) -> u32 {
        self.areas[player]
    }

    fn start_rect(&self, player: Participant) -> Rect {
        self.replay.start_rect(player)
    }
}
