//! Self-play between two strategies.

use std::fmt;

use crate::bitboard::{Cell, popcount};
use crate::constants::NO_MOVE;
use crate::position::{Position, cell_name};
use crate::strategy::Strategy;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{player} ({color}) chose illegal move {mv} at ply {ply}")]
    IllegalMove {
        player: String,
        color: Color,
        mv: String,
        ply: usize,
    },
}

/// A finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    /// Moves in order, with [`NO_MOVE`] for passes
    pub moves: Vec<Cell>,
    /// Final position, seen from the side that would move next
    pub last: Position,
    /// Final disc counts
    pub black: u32,
    pub white: u32,
}

impl GameRecord {
    /// The side with more discs, or `None` for a draw.
    pub fn winner(&self) -> Option<Color> {
        match self.black.cmp(&self.white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Moves as space-separated cell names, passes included.
    pub fn transcript(&self) -> String {
        self.moves
            .iter()
            .map(|&m| cell_name(m))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Play a game from the standard start, `black` moving first.
pub fn play_game(
    black: &mut dyn Strategy,
    white: &mut dyn Strategy,
) -> Result<GameRecord, GameError> {
    play_from(Position::initial(), Color::Black, black, white)
}

/// Play out `start`, where `to_move` owns `start.own`.
///
/// A side without a legal move passes without being asked; the game ends
/// when neither side can move.
pub fn play_from<'a>(
    start: Position,
    to_move: Color,
    black: &'a mut dyn Strategy,
    white: &'a mut dyn Strategy,
) -> Result<GameRecord, GameError> {
    let mut pos = start;
    let mut color = to_move;
    let mut moves = Vec::new();

    while !pos.is_terminal() {
        if pos.legal_moves() == 0 {
            log::trace!("{color} passes");
            moves.push(NO_MOVE);
            pos = pos.swapped();
            color = color.opposite();
            continue;
        }

        let player = match color {
            Color::Black => &mut *black,
            Color::White => &mut *white,
        };
        let mv = player.choose_move(pos.own, pos.opponent);
        if !pos.is_legal(mv) {
            return Err(GameError::IllegalMove {
                player: player.name().to_string(),
                color,
                mv: cell_name(mv),
                ply: moves.len(),
            });
        }

        log::trace!("{color} ({}) plays {}", player.name(), cell_name(mv));
        moves.push(mv);
        pos = pos.play(mv);
        color = color.opposite();
    }

    let (black_discs, white_discs) = match color {
        Color::Black => (popcount(pos.own), popcount(pos.opponent)),
        Color::White => (popcount(pos.opponent), popcount(pos.own)),
    };
    log::debug!(
        "game over after {} plies: black {black_discs} white {white_discs}",
        moves.len()
    );

    Ok(GameRecord {
        moves,
        last: pos,
        black: black_discs,
        white: white_discs,
    })
}
