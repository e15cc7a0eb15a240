//! # Grid Primitives
//!
//! Cell-type vocabulary and the rectangular grid the generator fills in.

use crate::{ForgeError, ForgeResult, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The contents of a single grid cell.
///
/// Exactly one cell type occupies each coordinate at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    Wall,
    Floor,
    Player,
    Exit,
    Enemy,
    Chest,
    Trap,
    /// A trap that has already been triggered by the movement layer
    ActiveTrap,
}

impl CellType {
    /// Single-character glyph used by text dumps.
    ///
    /// # Examples
    ///
    /// ```
    /// use dungeon_forge::CellType;
    ///
    /// assert_eq!(CellType::Wall.glyph(), '#');
    /// assert_eq!(CellType::from_glyph('#'), Some(CellType::Wall));
    /// ```
    pub fn glyph(self) -> char {
        match self {
            CellType::Wall => '#',
            CellType::Floor => '.',
            CellType::Player => '@',
            CellType::Exit => '>',
            CellType::Enemy => 'E',
            CellType::Chest => 'C',
            CellType::Trap => '^',
            CellType::ActiveTrap => '!',
        }
    }

    /// Parses a glyph produced by [`CellType::glyph`].
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(CellType::Wall),
            '.' => Some(CellType::Floor),
            '@' => Some(CellType::Player),
            '>' => Some(CellType::Exit),
            'E' => Some(CellType::Enemy),
            'C' => Some(CellType::Chest),
            '^' => Some(CellType::Trap),
            '!' => Some(CellType::ActiveTrap),
            _ => None,
        }
    }

    /// Whether the reachability checker may walk through this cell.
    pub fn is_passable(self) -> bool {
        matches!(self, CellType::Floor | CellType::Chest | CellType::Exit)
    }
}

/// A `rows × cols` grid of cell types, stored row-major.
///
/// Serializes as a list of glyph strings, one per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<Vec<CellType>>,
}

impl Grid {
    /// Creates a grid with every cell set to `fill`.
    pub fn new(rows: u32, cols: u32, fill: CellType) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![fill; cols as usize]; rows as usize],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn area(&self) -> u32 {
        self.rows * self.cols
    }

    /// Checks whether a position lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && (pos.row as u32) < self.rows && (pos.col as u32) < self.cols
    }

    /// Gets the cell type at a position, or None outside the grid.
    pub fn get(&self, pos: Position) -> Option<CellType> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.cells[pos.row as usize][pos.col as usize])
    }

    /// Writes a cell type and returns the one it replaced.
    pub fn set(&mut self, pos: Position, cell: CellType) -> ForgeResult<CellType> {
        if !self.in_bounds(pos) {
            return Err(ForgeError::OutOfBounds(pos));
        }
        let slot = &mut self.cells[pos.row as usize][pos.col as usize];
        Ok(std::mem::replace(slot, cell))
    }

    /// Checks whether a position lies on the outer wall ring.
    pub fn is_outer_ring(&self, pos: Position) -> bool {
        self.in_bounds(pos)
            && (pos.row == 0
                || pos.col == 0
                || pos.row as u32 == self.rows - 1
                || pos.col as u32 == self.cols - 1)
    }

    /// Checks whether a position is one of the four corners.
    pub fn is_corner(&self, pos: Position) -> bool {
        let last_row = self.rows as i32 - 1;
        let last_col = self.cols as i32 - 1;
        (pos.row == 0 || pos.row == last_row) && (pos.col == 0 || pos.col == last_col)
    }

    /// All strict-interior positions in row-major order.
    pub fn interior_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let rows = self.rows as i32;
        let cols = self.cols as i32;
        (1..rows - 1).flat_map(move |row| (1..cols - 1).map(move |col| Position::new(row, col)))
    }

    /// Counts the cells holding the given cell type.
    pub fn count(&self, cell: CellType) -> usize {
        self.iter().filter(|(_, current)| *current == cell).count()
    }

    /// Iterates over every `(position, cell)` pair in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellType)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (Position::new(row as i32, col as i32), *cell))
        })
    }
}

/// Allocates a walled grid with a floor interior.
///
/// The outer ring is Wall and the strict interior `[1..rows-2] × [1..cols-2]` is
/// Floor. Grids are never reused across attempts, so callers build a new one each
/// time.
///
/// # Examples
///
/// ```
/// use dungeon_forge::{build_base_grid, CellType, Position};
///
/// let grid = build_base_grid(5, 6);
/// assert_eq!(grid.get(Position::new(0, 3)), Some(CellType::Wall));
/// assert_eq!(grid.get(Position::new(2, 3)), Some(CellType::Floor));
/// assert_eq!(grid.count(CellType::Floor), 3 * 4);
/// ```
pub fn build_base_grid(rows: u32, cols: u32) -> Grid {
    let mut grid = Grid::new(rows, cols, CellType::Wall);
    for row in 1..rows.saturating_sub(1) as usize {
        for col in 1..cols.saturating_sub(1) as usize {
            grid.cells[row][col] = CellType::Floor;
        }
    }
    grid
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.cells.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            let line: String = row.iter().map(|cell| cell.glyph()).collect();
            f.write_str(&line)?;
        }
        Ok(())
    }
}

impl From<Grid> for Vec<String> {
    fn from(grid: Grid) -> Self {
        grid.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.glyph()).collect())
            .collect()
    }
}

impl TryFrom<Vec<String>> for Grid {
    type Error = ForgeError;

    fn try_from(lines: Vec<String>) -> ForgeResult<Self> {
        let mut cells = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let parsed = line
                .chars()
                .map(|glyph| {
                    CellType::from_glyph(glyph).ok_or_else(|| {
                        ForgeError::InvalidLayout(format!("unknown glyph '{glyph}' in row {row}"))
                    })
                })
                .collect::<ForgeResult<Vec<_>>>()?;
            cells.push(parsed);
        }

        let cols = cells.first().map_or(0, Vec::len);
        if cells.iter().any(|row| row.len() != cols) {
            return Err(ForgeError::InvalidLayout(
                "grid rows have different lengths".to_string(),
            ));
        }

        Ok(Self {
            rows: cells.len() as u32,
            cols: cols as u32,
            cells,
        })
    }
}
