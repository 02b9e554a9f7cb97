use std::fmt;
use std::ops::{Deref, DerefMut};

use super::player::Symbol;
use crate::error::MoveError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Number of consecutive pieces needed to win.
pub const WIN_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    /// Character used when the grid is printed.
    pub fn glyph(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// The symbol occupying this cell, if any.
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Symbol::X),
            Cell::O => Some(Symbol::O),
        }
    }
}

/// A `width` × `height` matrix of cells. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create a new empty 7×6 grid
    pub fn new() -> Self {
        Self::with_size(COLS, ROWS)
    }

    /// Create an empty grid of arbitrary size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Grid {
            cells: vec![Cell::Empty; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[self.index(row, column)]
    }

    fn index(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.height && column < self.width);
        row * self.width + column
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, column: usize) -> bool {
        column >= self.width || self.get(0, column) != Cell::Empty
    }

    /// Columns whose top cell is empty, in increasing order.
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..self.width)
            .filter(|&column| !self.is_column_full(column))
            .collect()
    }

    /// Check if the grid is completely full
    pub fn is_full(&self) -> bool {
        (0..self.width).all(|column| self.is_column_full(column))
    }

    /// The row a piece dropped into `column` would land on.
    pub fn landing_row(&self, column: usize) -> Result<usize, MoveError> {
        if column >= self.width {
            return Err(MoveError::InvalidColumn { column });
        }
        (0..self.height)
            .rev()
            .find(|&row| self.get(row, column) == Cell::Empty)
            .ok_or(MoveError::ColumnFull { column })
    }

    /// Write `symbol` into a cell without any legality check.
    pub fn place(&mut self, row: usize, column: usize, symbol: Symbol) {
        let idx = self.index(row, column);
        self.cells[idx] = symbol.to_cell();
    }

    /// Reset a cell to empty. Undoes a `place` on a previously empty cell.
    pub fn clear(&mut self, row: usize, column: usize) {
        let idx = self.index(row, column);
        self.cells[idx] = Cell::Empty;
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn play(&mut self, column: usize, symbol: Symbol) -> Result<usize, MoveError> {
        let row = self.landing_row(column)?;
        self.place(row, column, symbol);
        Ok(row)
    }

    /// Drop a piece that is taken back when the returned guard goes out of
    /// scope. Further speculation goes through the guard, so placements are
    /// always undone in reverse order.
    pub fn speculate(
        &mut self,
        column: usize,
        symbol: Symbol,
    ) -> Result<Speculation<'_>, MoveError> {
        let row = self.play(column, symbol)?;
        Ok(Speculation {
            grid: self,
            row,
            column,
        })
    }

    /// True if no occupied cell sits above an empty one.
    pub fn is_settled(&self) -> bool {
        (0..self.width).all(|column| {
            (1..self.height).all(|row| {
                self.get(row - 1, column) == Cell::Empty || self.get(row, column) != Cell::Empty
            })
        })
    }

    /// Every row, every column and every diagonal long enough to hold a win.
    ///
    /// Rows come top to bottom, columns left to right, then `\` diagonals and
    /// `/` diagonals.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> + '_ {
        let (width, height) = (self.width, self.height);

        let rows = (0..height).map(move |row| Line::new(self, LineKind::Row, (row, 0), width));
        let columns =
            (0..width).map(move |column| Line::new(self, LineKind::Column, (0, column), height));

        let down = (0..height)
            .rev()
            .map(|row| (row, 0))
            .chain((1..width).map(|column| (0, column)))
            .map(move |(row, column)| {
                let len = (height - row).min(width - column);
                Line::new(self, LineKind::DiagonalDown, (row, column), len)
            });
        let up = (0..height)
            .map(|row| (row, 0))
            .chain((1..width).map(move |column| (height - 1, column)))
            .map(move |(row, column)| {
                let len = (row + 1).min(width - column);
                Line::new(self, LineKind::DiagonalUp, (row, column), len)
            });

        rows.chain(columns)
            .chain(down.chain(up).filter(|line| line.len() >= WIN_LENGTH))
    }

    /// Collected form of [`Grid::lines`].
    pub fn all_lines(&self) -> Vec<Line<'_>> {
        self.lines().collect()
    }

    /// Build a grid from text rows, top row first. `X`, `O` and `-`/`.`
    /// are recognised; whitespace is ignored.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: &[&str]) -> Self {
        let parsed: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| match c {
                        'X' => Cell::X,
                        'O' => Cell::O,
                        '-' | '.' => Cell::Empty,
                        other => panic!("unexpected cell {other:?}"),
                    })
                    .collect()
            })
            .collect();
        let mut grid = Grid::with_size(parsed[0].len(), parsed.len());
        for (row, cells) in parsed.iter().enumerate() {
            assert_eq!(cells.len(), grid.width, "ragged row {row}");
            for (column, &cell) in cells.iter().enumerate() {
                if let Some(symbol) = cell.symbol() {
                    grid.place(row, column, symbol);
                }
            }
        }
        grid
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = (0..self.width).map(|c| c.to_string()).collect();
        writeln!(f, "{}", header.join(" "))?;
        writeln!(f)?;
        for row in 0..self.height {
            let cells: Vec<String> = (0..self.width)
                .map(|column| self.get(row, column).glyph().to_string())
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// A speculative piece on the grid, taken back on drop.
pub struct Speculation<'a> {
    grid: &'a mut Grid,
    row: usize,
    column: usize,
}

impl Deref for Speculation<'_> {
    type Target = Grid;

    fn deref(&self) -> &Grid {
        &*self.grid
    }
}

impl DerefMut for Speculation<'_> {
    fn deref_mut(&mut self) -> &mut Grid {
        &mut *self.grid
    }
}

impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        self.grid.clear(self.row, self.column);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Row,
    Column,
    /// Top-left to bottom-right (`\`).
    DiagonalDown,
    /// Bottom-left to top-right (`/`).
    DiagonalUp,
}

impl LineKind {
    fn offset(self, (row, column): (usize, usize), i: usize) -> (usize, usize) {
        match self {
            LineKind::Row => (row, column + i),
            LineKind::Column => (row + i, column),
            LineKind::DiagonalDown => (row + i, column + i),
            LineKind::DiagonalUp => (row - i, column + i),
        }
    }
}

/// Read-only ordered view of a row, column or diagonal.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    grid: &'a Grid,
    kind: LineKind,
    start: (usize, usize),
    len: usize,
}

impl<'a> Line<'a> {
    fn new(grid: &'a Grid, kind: LineKind, start: (usize, usize), len: usize) -> Self {
        Line {
            grid,
            kind,
            start,
            len,
        }
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Position of the first cell as `(row, column)`.
    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + 'a {
        let Line {
            grid, kind, start, ..
        } = *self;
        (0..self.len).map(move |i| {
            let (row, column) = kind.offset(start, i);
            grid.get(row, column)
        })
    }

    /// True if `length` consecutive cells hold `symbol`.
    pub fn contains_run(&self, symbol: Symbol, length: usize) -> bool {
        let target = symbol.to_cell();
        let mut run = 0;
        for cell in self.cells() {
            if cell == target {
                run += 1;
                if run >= length {
                    return true;
                }
            } else {
                run = 0;
            }
        }
        false
    }

    /// Non-overlapping occurrences of a `length`-run of `symbol`, scanning left
    /// to right. A run of 5 holds two 2-runs and one 3-run.
    pub fn count_runs(&self, symbol: Symbol, length: usize) -> usize {
        if length == 0 {
            return 0;
        }
        let target = symbol.to_cell();
        let mut count = 0;
        let mut run = 0;
        for cell in self.cells() {
            if cell == target {
                run += 1;
            } else {
                count += run / length;
                run = 0;
            }
        }
        count + run / length
    }
}
