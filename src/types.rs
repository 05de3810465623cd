use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors produced when parsing squares, pieces and index modes from text.
///
/// Table lookups never fail; text parsing for tooling is the only fallible surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid square `{0}`, expected a file a-h followed by a rank 1-8")]
    InvalidSquare(String),
    #[error("unrecognized piece type `{0}`")]
    InvalidPiece(char),
    #[error("color must be either `w` or `b`, got `{0}`")]
    InvalidColor(char),
    #[error("unknown index mode `{0}`, expected one of pext, fixed-shift, split32")]
    InvalidIndexMode(String),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn from_char(c: char) -> Result<Color, ParseError> {
        match c {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            other => Err(ParseError::InvalidColor(other)),
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    pub fn from_char(c: char) -> Result<PieceType, ParseError> {
        match c.to_ascii_lowercase() {
            'p' => Ok(PieceType::Pawn),
            'n' => Ok(PieceType::Knight),
            'b' => Ok(PieceType::Bishop),
            'r' => Ok(PieceType::Rook),
            'q' => Ok(PieceType::Queen),
            'k' => Ok(PieceType::King),
            _ => Err(ParseError::InvalidPiece(c)),
        }
    }

    /// Is the piece a sliding piece (one which can move multiple square in a given direction)
    pub fn is_sliding(&self) -> bool {
        matches!(*self, PieceType::Rook | PieceType::Bishop | PieceType::Queen)
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

impl FromStr for PieceType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let found = PieceType::ALL.into_iter().find(|pt| pt.to_human() == lower);
        match (found, s.chars().next()) {
            (Some(pt), _) => Ok(pt),
            (None, Some(c)) if s.len() == 1 => PieceType::from_char(c),
            (None, c) => Err(ParseError::InvalidPiece(c.unwrap_or(' '))),
        }
    }
}

/// The two kinds of sliding movement. Queens slide both ways and are never stored separately.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SliderKind {
    Rook,
    Bishop,
}

impl SliderKind {
    pub const ALL: [SliderKind; 2] = [SliderKind::Rook, SliderKind::Bishop];

    /// Steps walked by the reference raycaster.
    pub const fn directions(self) -> [i8; 4] {
        match self {
            SliderKind::Rook => [NORTH, SOUTH, EAST, WEST],
            SliderKind::Bishop => [NORTH_EAST, SOUTH_EAST, SOUTH_WEST, NORTH_WEST],
        }
    }

    /// Width of the fixed-shift bucket index for this slider.
    pub const fn fixed_bits(self) -> u32 {
        match self {
            SliderKind::Rook => 12,
            SliderKind::Bishop => 9,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn piece_type(self) -> PieceType {
        match self {
            SliderKind::Rook => PieceType::Rook,
            SliderKind::Bishop => PieceType::Bishop,
        }
    }
}

impl TryFrom<PieceType> for SliderKind {
    type Error = PieceType;

    fn try_from(pt: PieceType) -> Result<Self, Self::Error> {
        match pt {
            PieceType::Rook => Ok(SliderKind::Rook),
            PieceType::Bishop => Ok(SliderKind::Bishop),
            other => Err(other),
        }
    }
}

// Square index steps, a1 = 0 and h8 = 63.
pub const NORTH: i8 = 8;
pub const SOUTH: i8 = -8;
pub const EAST: i8 = 1;
pub const WEST: i8 = -1;
pub const NORTH_EAST: i8 = NORTH + EAST;
pub const NORTH_WEST: i8 = NORTH + WEST;
pub const SOUTH_EAST: i8 = SOUTH + EAST;
pub const SOUTH_WEST: i8 = SOUTH + WEST;

pub const KING_STEPS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];
pub const KNIGHT_STEPS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

/// A board square. Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    pub const A1: Square = Square(0);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const H8: Square = Square(63);

    /// Build a square from a 0-indexed file (a = 0) and rank (1st rank = 0).
    #[inline(always)]
    pub const fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    #[inline(always)]
    pub const fn from_index(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    /// All squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> + Clone {
        (0..Square::COUNT as u8).map(Square)
    }

    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline(always)]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    /// Rank from the point of view of `color`, 0 being its back rank.
    #[inline(always)]
    pub const fn relative_rank(self, color: Color) -> u8 {
        match color {
            Color::White => self.rank(),
            Color::Black => 7 - self.rank(),
        }
    }

    /// Raw index arithmetic. `None` only when the result leaves 0..64; file wrap is not checked.
    #[inline]
    pub fn offset(self, step: i8) -> Option<Square> {
        let to = self.0 as i16 + step as i16;
        (0..64).contains(&to).then(|| Square(to as u8))
    }

    pub fn from_algebraic(s: &str) -> Result<Square, ParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file >= 8 || rank >= 8 {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }
        Ok(Square::new(file, rank))
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s)
    }
}
