//! Othello position representation.
//!
//! A [`Position`] is the pair of bitboards seen from the side to move: `own`
//! holds the mover's discs and `opponent` the other side's. Playing a move
//! swaps the two, so the side to move is always `own`.

use std::fmt;
use std::str::FromStr;

use crate::bitboard::{Cell, apply_move, bit_to_cell, cell_to_bit, legal_moves, popcount};
use crate::constants::{CELLS, N, NO_MOVE, START_BLACK, START_WHITE};

/// Error returned when text or an array cannot be turned into a position.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsePositionError {
    #[error("expected 64 cells, found {0}")]
    Length(usize),
    #[error("unexpected character {0:?} at cell {1}")]
    Char(char, usize),
    #[error("unexpected value {0} at cell {1}")]
    Value(i8, usize),
    #[error("cell {0} is claimed by both sides")]
    Overlap(Cell),
}

/// An Othello position from the perspective of the side to move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Discs of the side to move
    pub own: u64,
    /// Discs of the other side
    pub opponent: u64,
}

impl Position {
    pub const fn new(own: u64, opponent: u64) -> Self {
        Self { own, opponent }
    }

    /// Standard starting position, black to move.
    pub const fn initial() -> Self {
        Self::new(START_BLACK, START_WHITE)
    }

    /// The same board with the other side to move.
    #[inline]
    pub const fn swapped(self) -> Self {
        Self::new(self.opponent, self.own)
    }

    #[inline]
    pub fn legal_moves(self) -> u64 {
        legal_moves(self.own, self.opponent)
    }

    #[inline]
    pub fn is_legal(self, cell: Cell) -> bool {
        cell < CELLS && self.legal_moves() & cell_to_bit(cell) != 0
    }

    /// Play a legal cell, or pass with [`NO_MOVE`], handing the turn over.
    ///
    /// The cell must be legal; use [`Position::is_legal`] first.
    pub fn play(self, cell: Cell) -> Self {
        if cell == NO_MOVE {
            return self.swapped();
        }
        let (own, opponent) = apply_move(self.own, self.opponent, cell_to_bit(cell));
        Self::new(opponent, own)
    }

    /// `true` when neither side can move.
    pub fn is_terminal(self) -> bool {
        self.legal_moves() == 0 && legal_moves(self.opponent, self.own) == 0
    }

    /// Disc difference from the side to move.
    pub fn disc_diff(self) -> i32 {
        popcount(self.own) as i32 - popcount(self.opponent) as i32
    }

    pub fn empties(self) -> u32 {
        CELLS as u32 - popcount(self.own | self.opponent)
    }

    /// Build a position from a cell array: `1` own, `-1` opponent, `0` empty.
    pub fn from_cells(cells: &[i8]) -> Result<Self, ParsePositionError> {
        if cells.len() != CELLS {
            return Err(ParsePositionError::Length(cells.len()));
        }
        let mut pos = Self::default();
        for (i, &c) in cells.iter().enumerate() {
            match c {
                1 => pos.own |= cell_to_bit(i),
                -1 => pos.opponent |= cell_to_bit(i),
                0 => {}
                other => return Err(ParsePositionError::Value(other, i)),
            }
        }
        Ok(pos)
    }

    /// Cell array form: `1` own, `-1` opponent, `0` empty.
    pub fn to_cells(self) -> Result<[i8; CELLS], ParsePositionError> {
        let overlap = self.own & self.opponent;
        if overlap != 0 {
            return Err(ParsePositionError::Overlap(bit_to_cell(overlap)));
        }
        let mut cells = [0i8; CELLS];
        for (i, c) in cells.iter_mut().enumerate() {
            let bit = cell_to_bit(i);
            if self.own & bit != 0 {
                *c = 1;
            } else if self.opponent & bit != 0 {
                *c = -1;
            }
        }
        Ok(cells)
    }
}

/// Parses 64 cells in row-major order, ignoring whitespace.
///
/// `X` marks the side to move, `O` the other side, `.` or `-` an empty cell.
/// Both cases are accepted.
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pos = Self::default();
        let mut i = 0;
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            if i >= CELLS {
                return Err(ParsePositionError::Length(i + 1));
            }
            match ch {
                'X' | 'x' => pos.own |= cell_to_bit(i),
                'O' | 'o' => pos.opponent |= cell_to_bit(i),
                '.' | '-' => {}
                other => return Err(ParsePositionError::Char(other, i)),
            }
            i += 1;
        }
        if i != CELLS {
            return Err(ParsePositionError::Length(i));
        }
        Ok(pos)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves = self.legal_moves();
        write!(f, " ")?;
        for col in 0..N {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..N {
            write!(f, "{}", row + 1)?;
            for col in 0..N {
                let bit = cell_to_bit(row * N + col);
                let ch = if self.own & bit != 0 {
                    'X'
                } else if self.opponent & bit != 0 {
                    'O'
                } else if moves & bit != 0 {
                    '*'
                } else {
                    '.'
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parse a cell name such as `d3`, or `pass`.
///
/// Returns `None` for anything that is not on the board.
pub fn parse_cell(s: &str) -> Option<Cell> {
    let s = s.trim().to_ascii_lowercase();
    if s == "pass" {
        return Some(NO_MOVE);
    }
    let mut chars = s.chars();
    let col = chars.next()?;
    let row: usize = chars.as_str().parse().ok()?;
    if !('a'..='h').contains(&col) || !(1..=N).contains(&row) {
        return None;
    }
    Some((row - 1) * N + (col as usize - 'a' as usize))
}

/// Cell name (`a1`..`h8`), or `pass` for [`NO_MOVE`].
pub fn cell_name(cell: Cell) -> String {
    if cell >= CELLS {
        return "pass".to_string();
    }
    let col = (b'a' + (cell % N) as u8) as char;
    format!("{}{}", col, cell / N + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_TEXT: &str = "
        ........
        ........
        ........
        ...OX...
        ...XO...
        ........
        ........
        ........";

    #[test]
    fn test_parse_start() {
        let pos: Position = START_TEXT.parse().unwrap();
        assert_eq!(pos, Position::initial());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("X".parse::<Position>(), Err(ParsePositionError::Length(1)));
        let bad = START_TEXT.replacen('.', "?", 1);
        assert_eq!(bad.parse::<Position>(), Err(ParsePositionError::Char('?', 0)));
        let long = format!("{START_TEXT}.");
        assert_eq!(long.parse::<Position>(), Err(ParsePositionError::Length(65)));
    }

    #[test]
    fn test_cells_roundtrip() {
        let pos = Position::initial();
        let cells = pos.to_cells().unwrap();
        assert_eq!(cells[28], 1);
        assert_eq!(cells[27], -1);
        assert_eq!(Position::from_cells(&cells).unwrap(), pos);
    }

    #[test]
    fn test_to_cells_overlap() {
        let pos = Position::new(cell_to_bit(5), cell_to_bit(5));
        assert_eq!(pos.to_cells(), Err(ParsePositionError::Overlap(5)));
    }

    #[test]
    fn test_from_cells_rejects() {
        assert_eq!(
            Position::from_cells(&[0; 10]),
            Err(ParsePositionError::Length(10))
        );
        let mut cells = [0i8; CELLS];
        cells[3] = 2;
        assert_eq!(
            Position::from_cells(&cells),
            Err(ParsePositionError::Value(2, 3))
        );
    }

    #[test]
    fn test_cell_names() {
        assert_eq!(parse_cell("a1"), Some(0));
        assert_eq!(parse_cell("H8"), Some(63));
        assert_eq!(parse_cell("d3"), Some(19));
        assert_eq!(parse_cell("pass"), Some(NO_MOVE));
        assert_eq!(parse_cell("i1"), None);
        assert_eq!(parse_cell("a9"), None);
        assert_eq!(parse_cell(""), None);
        for cell in 0..CELLS {
            assert_eq!(parse_cell(&cell_name(cell)), Some(cell));
        }
        assert_eq!(cell_name(NO_MOVE), "pass");
    }

    #[test]
    fn test_play_swaps_sides() {
        let pos = Position::initial();
        let next = pos.play(19);
        assert_eq!(popcount(next.own), 1);
        assert_eq!(popcount(next.opponent), 4);
        assert_eq!(next.disc_diff(), -3);
        assert_eq!(pos.play(NO_MOVE), pos.swapped());
    }

    #[test]
    fn test_terminal() {
        assert!(!Position::initial().is_terminal());
        assert!(Position::new(u64::MAX, 0).is_terminal());
        assert_eq!(Position::initial().empties(), 60);
    }

    #[test]
    fn test_display_marks_moves() {
        let text = Position::initial().to_string();
        assert_eq!(text.matches('*').count(), 4);
        assert_eq!(text.lines().count(), N + 1);
    }
}
