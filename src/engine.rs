use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

impl FromStr for Move {
    type Err = EngineError;

    /// Accepts full names plus `wasd` and vi-style `hjkl` keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" | "k" => Ok(Move::Up),
            "down" | "s" | "j" => Ok(Move::Down),
            "left" | "a" | "h" => Ok(Move::Left),
            "right" | "d" | "l" => Ok(Move::Right),
            other => Err(EngineError::UnknownMove(other.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown move '{0}' (use up/down/left/right or w/a/s/d)")]
    UnknownMove(String),
    #[error("tile value {0} is not 0 or a power of two up to 32768")]
    InvalidTile(u32),
}

const LINE_TABLE_SIZE: usize = 0x1_0000; // 65,536 possible 16-bit lines
/// Largest exponent a nibble can hold (2^15 = 32768). Such tiles never merge.
const MAX_EXPONENT: u8 = 15;

struct Tables {
    shift_left: Box<[Line]>,
    gain_left: Box<[Score]>,
}

type BoardRaw = u64;
type Line = u16;
type Score = u32;

/// Packed 4x4 2048 board as 16 4-bit exponents in a `u64`.
///
/// Cell 0 (top-left) lives in the highest nibble, cells run row-major.
/// An exponent of 0 is an empty cell, `e` stands for the tile `2^e`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board(BoardRaw);

/// Result of sliding a board without inserting a new tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub board: Board,
    /// Sum of the merged tile values produced by this slide.
    pub gained: u32,
}

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    /// Construct a `Board` from its raw packed representation.
    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self {
        Board(raw)
    }

    /// Borrow the raw packed `u64` for this `Board`.
    #[inline]
    pub fn raw(&self) -> BoardRaw {
        self.0
    }

    /// Build a board from tile values (0 = empty).
    ///
    /// ```
    /// use milbase::engine::Board;
    /// let b = Board::from_grid(&[[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
    /// assert_eq!(b.tile_value(0), 2);
    /// assert_eq!(b.tile_value(15), 4);
    /// ```
    pub fn from_grid(grid: &[[u32; 4]; 4]) -> Result<Self, EngineError> {
        let mut raw: BoardRaw = 0;
        for (idx, &val) in grid.iter().flatten().enumerate() {
            let exp = value_to_exponent(val)?;
            raw |= (exp as u64) << (60 - 4 * idx);
        }
        Ok(Board(raw))
    }

    /// Tile values row by row (0 = empty).
    pub fn to_grid(self) -> [[u32; 4]; 4] {
        let mut grid = [[0u32; 4]; 4];
        for (idx, cell) in grid.iter_mut().flatten().enumerate() {
            *cell = self.tile_value(idx);
        }
        grid
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    #[inline]
    pub fn shift(self, dir: Move) -> Self {
        self.slide(dir).board
    }

    /// Slide/merge tiles in `dir`, reporting the score gained by the merges.
    ///
    /// Every direction is reduced to the canonical left shift: rows are
    /// reflected for `Right`, the board is transposed for `Up`, and both
    /// for `Down`. The line result is then oriented back.
    ///
    /// ```
    /// use milbase::engine::{Board, Move};
    /// let b = Board::from_grid(&[[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// let s = b.slide(Move::Left);
    /// assert_eq!(s.board.to_grid()[0], [4, 8, 0, 0]);
    /// assert_eq!(s.gained, 12);
    /// ```
    pub fn slide(self, dir: Move) -> Slide {
        let t = tables();
        let transposed = matches!(dir, Move::Up | Move::Down);
        let reflected = matches!(dir, Move::Right | Move::Down);
        let src = if transposed { transpose(self.0) } else { self.0 };

        let mut out: BoardRaw = 0;
        let mut gained: Score = 0;
        for row_idx in 0..4 {
            let mut line = extract_line(src, row_idx);
            if reflected {
                line = reverse_line(line);
            }
            let mut shifted = t.shift_left[line as usize];
            gained += t.gain_left[line as usize];
            if reflected {
                shifted = reverse_line(shifted);
            }
            out |= (shifted as BoardRaw) << (48 - 16 * row_idx);
        }
        if transposed {
            out = transpose(out);
        }
        Slide { board: Board(out), gained }
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a uniformly random empty slot.
    ///
    /// A full board is returned unchanged.
    ///
    /// ```
    /// use milbase::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let empty = self.count_empty();
        if empty == 0 {
            return self;
        }
        let mut index = rng.gen_range(0..empty);
        let exp = generate_random_tile(rng);
        for cell in 0..16 {
            if self.exponent(cell) != 0 {
                continue;
            }
            if index == 0 {
                return Board(self.0 | ((exp as u64) << (60 - 4 * cell)));
            }
            index -= 1;
        }
        self
    }

    /// Perform a move then insert a random tile if the move changed the board.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        let moved = self.shift(direction);
        if moved != self {
            moved.with_random_tile(rng)
        } else {
            self
        }
    }

    /// True when no empty cell remains and no two orthogonal neighbours match.
    ///
    /// ```
    /// use milbase::engine::Board;
    /// assert!(!Board::EMPTY.is_game_over());
    /// ```
    pub fn is_game_over(self) -> bool {
        if self.count_empty() > 0 {
            return false;
        }
        for row in 0..4 {
            for col in 0..4 {
                let exp = self.exponent(row * 4 + col);
                if exp >= MAX_EXPONENT {
                    continue;
                }
                if col < 3 && self.exponent(row * 4 + col + 1) == exp {
                    return false;
                }
                if row < 3 && self.exponent((row + 1) * 4 + col) == exp {
                    return false;
                }
            }
        }
        true
    }

    /// Return the highest tile value (e.g., 2048) present on the board, 0 when empty.
    pub fn highest_tile(self) -> u32 {
        (0..16).map(|idx| self.tile_value(idx)).max().unwrap_or(0)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> u32 {
        16 - count_non_empty(self.0)
    }

    /// Get the actual value at index (0 when empty).
    ///
    /// Index runs 0..16 row-major.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= 16`.
    #[inline]
    pub fn tile_value(self, idx: usize) -> u32 {
        assert!(idx < 16, "tile index {idx} out of range 0..16");
        match self.exponent(idx) {
            0 => 0,
            exp => 1u32 << exp,
        }
    }

    #[inline]
    fn exponent(self, idx: usize) -> u8 {
        debug_assert!(idx < 16);
        ((self.0 >> (60 - 4 * idx)) & 0xf) as u8
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "+------+------+------+------+";
        writeln!(f, "{separator}")?;
        for row in self.to_grid() {
            for val in row {
                match val {
                    0 => write!(f, "|      ")?,
                    v => write!(f, "|{v:^6}")?,
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "{separator}")?;
        }
        Ok(())
    }
}

impl From<BoardRaw> for Board {
    fn from(v: BoardRaw) -> Self {
        Board::from_raw(v)
    }
}

/// What happened after a single `Game2048::play` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False when the direction left the board unchanged (no tile was spawned).
    pub moved: bool,
    pub gained: u32,
    pub game_over: bool,
}

/// One 2048 session: the board plus its running score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game2048 {
    board: Board,
    score: u64,
    moves: u32,
}

impl Game2048 {
    /// Start a game with two random tiles.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let board = Board::EMPTY.with_random_tile(rng).with_random_tile(rng);
        Self::from_board(board)
    }

    pub fn from_board(board: Board) -> Self {
        Game2048 { board, score: 0, moves: 0 }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Slide in `dir`; when the board changed, add the merge score and spawn a tile.
    pub fn play<R: Rng + ?Sized>(&mut self, dir: Move, rng: &mut R) -> MoveOutcome {
        let slide = self.board.slide(dir);
        if slide.board == self.board {
            return MoveOutcome { moved: false, gained: 0, game_over: self.is_over() };
        }
        self.board = slide.board.with_random_tile(rng);
        self.score += slide.gained as u64;
        self.moves += 1;
        MoveOutcome { moved: true, gained: slide.gained, game_over: self.is_over() }
    }
}

/// Initialize internal tables ahead of first use. Safe to call multiple times.
pub fn new() {
    tables();
}

// Credit to Nneonneo
pub(crate) fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

#[inline]
fn extract_line(board: BoardRaw, line_idx: usize) -> Line {
    ((board >> ((3 - line_idx) * 16)) & 0xffff) as Line
}

#[inline]
fn reverse_line(line: Line) -> Line {
    ((line & 0x000f) << 12) | ((line & 0x00f0) << 4) | ((line & 0x0f00) >> 4) | ((line & 0xf000) >> 12)
}

fn value_to_exponent(val: u32) -> Result<u8, EngineError> {
    match val {
        0 => Ok(0),
        v if v.is_power_of_two() && v >= 2 && v <= 1 << MAX_EXPONENT => Ok(v.trailing_zeros() as u8),
        v => Err(EngineError::InvalidTile(v)),
    }
}

static TABLES: OnceLock<Tables> = OnceLock::new();

#[inline(always)]
fn tables() -> &'static Tables {
    TABLES.get_or_init(create_tables)
}

fn create_tables() -> Tables {
    // Allocate on the heap to avoid large stack frames
    let mut shift_left = vec![0 as Line; LINE_TABLE_SIZE];
    let mut gain_left = vec![0 as Score; LINE_TABLE_SIZE];
    for val in 0..LINE_TABLE_SIZE {
        let (line, gained) = shift_line_left(val as Line);
        shift_left[val] = line;
        gain_left[val] = gained;
    }
    Tables {
        shift_left: shift_left.into_boxed_slice(),
        gain_left: gain_left.into_boxed_slice(),
    }
}

fn line_to_tiles(line: Line) -> [u8; 4] {
    [
        ((line >> 12) & 0xf) as u8,
        ((line >> 8) & 0xf) as u8,
        ((line >> 4) & 0xf) as u8,
        (line & 0xf) as u8,
    ]
}

fn tiles_to_line(tiles: [u8; 4]) -> Line {
    (tiles[0] as Line) << 12 | (tiles[1] as Line) << 8 | (tiles[2] as Line) << 4 | tiles[3] as Line
}

/// Compact, merge each equal pair once scanning from the left, compact again.
fn shift_line_left(line: Line) -> (Line, Score) {
    let packed: Vec<u8> = line_to_tiles(line).into_iter().filter(|&t| t != 0).collect();
    let mut out = [0u8; 4];
    let mut gained: Score = 0;
    let mut src = 0;
    let mut dst = 0;
    while src < packed.len() {
        let tile = packed[src];
        if src + 1 < packed.len() && packed[src + 1] == tile && tile < MAX_EXPONENT {
            out[dst] = tile + 1;
            gained += (1 as Score) << (tile + 1);
            src += 2;
        } else {
            out[dst] = tile;
            src += 1;
        }
        dst += 1;
    }
    (tiles_to_line(out), gained)
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    if rng.gen_range(0..10) < 9 {
        1
    } else {
        2
    }
}

// https://stackoverflow.com/questions/38225571/count-number-of-zero-nibbles-in-an-unsigned-64-bit-integer
fn count_non_empty(board: BoardRaw) -> u32 {
    let mut board_copy = board;
    board_copy |= board_copy >> 1;
    board_copy |= board_copy >> 2;
    board_copy &= 0x1111111111111111;
    board_copy.count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn shift(board: Board, dir: Move) -> Board {
        board.shift(dir)
    }

    #[test]
    fn it_shift_line_left() {
        assert_eq!(shift_line_left(0x0000), (0x0000, 0));
        assert_eq!(shift_line_left(0x1212), (0x1212, 0));
        assert_eq!(shift_line_left(0x1122), (0x2300, 4 + 8));
        assert_eq!(shift_line_left(0x1001), (0x2000, 4));
        // first pair wins, the third tile stays single
        assert_eq!(shift_line_left(0x2220), (0x3200, 8));
        assert_eq!(shift_line_left(0x1111), (0x2200, 8));
    }

    #[test]
    fn capped_tiles_do_not_merge() {
        assert_eq!(shift_line_left(0xff00), (0xff00, 0));
        assert_eq!(shift_line_left(0x0f0f), (0xff00, 0));
    }

    #[test]
    fn it_reverse_line() {
        assert_eq!(reverse_line(0x1234), 0x4321);
        assert_eq!(reverse_line(0x0001), 0x1000);
    }

    #[test]
    fn it_insert_random_tile_until_full() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut game = Board::EMPTY;
        for _ in 0..16 {
            game = game.with_random_tile(&mut rng);
        }
        assert_eq!(game.count_empty(), 0);
        assert_eq!(game.with_random_tile(&mut rng), game);
        for idx in 0..16 {
            assert!(matches!(game.tile_value(idx), 2 | 4));
        }
    }

    #[test]
    fn test_shift_left() {
        new();
        assert_eq!(shift(Board::from_raw(0x0000), Move::Left), Board::from_raw(0x0000));
        assert_eq!(shift(Board::from_raw(0x0002), Move::Left), Board::from_raw(0x2000));
        assert_eq!(shift(Board::from_raw(0x2020), Move::Left), Board::from_raw(0x3000));
        assert_eq!(shift(Board::from_raw(0x1332), Move::Left), Board::from_raw(0x1420));
        assert_eq!(shift(Board::from_raw(0x1234), Move::Left), Board::from_raw(0x1234));
        assert_eq!(shift(Board::from_raw(0x1002), Move::Left), Board::from_raw(0x1200));
        assert_ne!(shift(Board::from_raw(0x1210), Move::Left), Board::from_raw(0x2200));
    }

    #[test]
    fn test_shift_right() {
        new();
        assert_eq!(shift(Board::from_raw(0x0000), Move::Right), Board::from_raw(0x0000));
        assert_eq!(shift(Board::from_raw(0x2000), Move::Right), Board::from_raw(0x0002));
        assert_eq!(shift(Board::from_raw(0x2020), Move::Right), Board::from_raw(0x0003));
        assert_eq!(shift(Board::from_raw(0x1332), Move::Right), Board::from_raw(0x0142));
        assert_eq!(shift(Board::from_raw(0x1234), Move::Right), Board::from_raw(0x1234));
        assert_eq!(shift(Board::from_raw(0x1002), Move::Right), Board::from_raw(0x0012));
        assert_ne!(shift(Board::from_raw(0x0121), Move::Right), Board::from_raw(0x0022));
    }

    #[test]
    fn test_move_left() {
        let game = Board::from_raw(0x1234133220021002);
        let slide = game.slide(Move::Left);
        assert_eq!(slide.board, Board::from_raw(0x1234142030001200));
        assert_eq!(slide.gained, 16 + 8);
    }

    #[test]
    fn test_move_up() {
        let game = Board::from_raw(0x1121230033004222);
        let slide = game.slide(Move::Up);
        assert_eq!(slide.board, Board::from_raw(0x1131240232004000));
        assert_eq!(slide.gained, 16 + 8);
    }

    #[test]
    fn test_move_right() {
        let game = Board::from_raw(0x1234133220021002);
        assert_eq!(shift(game, Move::Right), Board::from_raw(0x1234014200030012));
    }

    #[test]
    fn test_move_down() {
        let game = Board::from_raw(0x1121230033004222);
        assert_eq!(shift(game, Move::Down), Board::from_raw(0x1000210034014232));
    }

    #[test]
    fn grid_conversion_rejects_bad_values() {
        assert_eq!(Board::from_grid(&[[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]), Err(EngineError::InvalidTile(3)));
        assert_eq!(Board::from_grid(&[[1, 0, 0, 0], [0; 4], [0; 4], [0; 4]]), Err(EngineError::InvalidTile(1)));
        assert_eq!(
            Board::from_grid(&[[65536, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
            Err(EngineError::InvalidTile(65536))
        );
        let grid = [[2, 4, 8, 16], [32, 64, 128, 256], [512, 1024, 2048, 4096], [8192, 16384, 32768, 0]];
        assert_eq!(Board::from_grid(&grid).map(Board::to_grid), Ok(grid));
    }

    #[test]
    fn game_over_requires_full_board_without_pairs() {
        let stuck = Board::from_grid(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        assert!(stuck.is_game_over());
        for dir in Move::ALL {
            assert_eq!(stuck.shift(dir), stuck);
        }
        let vertical_pair = Board::from_grid(&[[2, 4, 2, 4], [2, 8, 4, 2], [8, 4, 2, 4], [4, 2, 4, 2]]).unwrap();
        assert!(!vertical_pair.is_game_over());
        let one_gap = Board::from_grid(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]).unwrap();
        assert!(!one_gap.is_game_over());
    }

    #[test]
    fn it_spawn_rates() {
        let mut rng = StdRng::seed_from_u64(2048);
        let mut fours = 0;
        let mut cells = [0u32; 16];
        for _ in 0..10_000 {
            let b = Board::EMPTY.with_random_tile(&mut rng);
            assert_eq!(b.count_empty(), 15);
            let idx = (0..16).find(|&i| b.tile_value(i) != 0).unwrap();
            cells[idx] += 1;
            if b.tile_value(idx) == 4 {
                fours += 1;
            }
        }
        assert!((800..=1200).contains(&fours), "{fours} fours in 10000 spawns");
        for (idx, &n) in cells.iter().enumerate() {
            assert!((500..=750).contains(&n), "cell {idx} chosen {n} times");
        }
    }

    #[test]
    fn it_spawn_only_into_empty_cells() {
        let mut rng = StdRng::seed_from_u64(8);
        // Every cell holds an 8 except index 6.
        let board = Board::from_raw(0x3333_3303_3333_3333);
        assert_eq!(board.count_empty(), 1);
        for _ in 0..50 {
            let b = board.with_random_tile(&mut rng);
            assert_eq!(b.count_empty(), 0);
            assert!(matches!(b.tile_value(6), 2 | 4));
            assert_eq!(b.raw() & !0x0000_00f0_0000_0000, board.raw());
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn it_tile_value_rejects_bad_index() {
        Board::EMPTY.tile_value(16);
    }

    #[test]
    fn it_count_empty() {
        assert_eq!(Board::from_raw(0x1111000011110000).count_empty(), 8);
        assert_eq!(Board::from_raw(0x1100000000000000).count_empty(), 14);
        assert_eq!(count_non_empty(0x1134000000000000), 4);
    }

    #[test]
    fn it_get_tile_val() {
        let game = Board::from_raw(0x0123456789abcdef);
        assert_eq!(game.tile_value(0), 0);
        assert_eq!(game.tile_value(3), 8);
        assert_eq!(game.tile_value(10), 1024);
        assert_eq!(game.tile_value(15), 32768);
        assert_eq!(game.highest_tile(), 32768);
    }

    #[test]
    fn parse_moves() {
        assert_eq!("W".parse::<Move>(), Ok(Move::Up));
        assert_eq!("left".parse::<Move>(), Ok(Move::Left));
        assert_eq!(" j ".parse::<Move>(), Ok(Move::Down));
        assert_eq!("d".parse::<Move>(), Ok(Move::Right));
        assert!("x".parse::<Move>().is_err());
    }

    #[test]
    fn session_scores_merges_and_spawns_once() {
        let mut rng = StdRng::seed_from_u64(9);
        let board = Board::from_grid(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let mut game = Game2048::from_board(board);

        let out = game.play(Move::Left, &mut rng);
        assert!(out.moved);
        assert_eq!(out.gained, 4);
        assert_eq!(game.score(), 4);
        assert_eq!(game.moves(), 1);
        assert_eq!(game.board().count_empty(), 14);

        let before = game.board();
        let blocked = game.board().shift(Move::Left) == before;
        if blocked {
            let out = game.play(Move::Left, &mut rng);
            assert!(!out.moved);
            assert_eq!(game.board(), before);
            assert_eq!(game.moves(), 1);
        }
    }

    #[test]
    fn new_game_has_two_tiles() {
        let mut rng = StdRng::seed_from_u64(42);
        let game = Game2048::new(&mut rng);
        assert_eq!(game.board().count_empty(), 14);
        assert_eq!(game.score(), 0);
        assert!(!game.is_over());
    }
}
