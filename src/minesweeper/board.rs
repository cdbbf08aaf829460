//=========================================================================
// Minesweeper Board
//=========================================================================
//
// Grid of cells with lazily placed mines.
//
// Mines are placed on the first reveal, never under the revealed cell,
// using a seeded generator so a seed always produces the same game for
// the same first click. Boards built from explicit mine positions skip
// the lazy step.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use oorandom::Rand32;

//=== Cell ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub mine: bool,

    /// Mines among the eight neighbours.
    pub adjacent: u8,

    pub state: CellState,
}

//=== RevealOutcome =======================================================

/// Result of [`Board::reveal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Out of bounds, flagged or already revealed.
    Ignored,

    /// Safe cells were opened (count includes flood fill).
    Revealed(usize),

    /// The cell held a mine.
    Mine,

    /// The last safe cell was opened.
    Cleared,
}

//=== Board ===============================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    mine_count: usize,
    seed: u64,
    mines_placed: bool,
    revealed: usize,
    cells: Vec<Cell>,
}

impl Board {
    //--- Construction -----------------------------------------------------

    /// Empty board whose mines are placed on the first reveal.
    ///
    /// The mine count is clamped so at least one cell is safe.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize, mines: usize, seed: u64) -> Self {
        assert!(width > 0 && height > 0, "Board size must be positive, got {}x{}", width, height);

        Self {
            width,
            height,
            mine_count: mines.min(width * height - 1),
            seed,
            mines_placed: false,
            revealed: 0,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Board with mines at fixed `(x, y)` positions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or a position is out of bounds.
    pub fn from_mines(width: usize, height: usize, mines: &[(usize, usize)]) -> Self {
        let mut board = Self::new(width, height, 0, 0);
        for &(x, y) in mines {
            let index = board
                .index(x, y)
                .unwrap_or_else(|| panic!("Mine ({}, {}) outside {}x{} board", x, y, width, height));
            if !board.cells[index].mine {
                board.cells[index].mine = true;
                board.mine_count += 1;
            }
        }
        board.mines_placed = true;
        board.compute_adjacency();
        board
    }

    //--- Queries ----------------------------------------------------------

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn flags_placed(&self) -> usize {
        self.cells.iter().filter(|c| c.state == CellState::Flagged).count()
    }

    /// Safe cells still hidden or flagged.
    pub fn safe_remaining(&self) -> usize {
        self.cells.len() - self.mine_count - self.revealed
    }

    pub fn is_cleared(&self) -> bool {
        self.safe_remaining() == 0
    }

    //--- Moves ------------------------------------------------------------

    /// Opens a cell, flood-filling from cells with no adjacent mines.
    pub fn reveal(&mut self, x: usize, y: usize) -> RevealOutcome {
        let Some(index) = self.index(x, y) else {
            return RevealOutcome::Ignored;
        };
        if self.cells[index].state != CellState::Hidden {
            return RevealOutcome::Ignored;
        }

        if !self.mines_placed {
            self.place_mines(index);
        }

        if self.cells[index].mine {
            self.cells[index].state = CellState::Revealed;
            return RevealOutcome::Mine;
        }

        let opened = self.flood_fill(index);
        self.revealed += opened;

        if self.is_cleared() {
            RevealOutcome::Cleared
        } else {
            RevealOutcome::Revealed(opened)
        }
    }

    /// Toggles a flag on a hidden cell. Returns `false` if nothing changed.
    pub fn toggle_flag(&mut self, x: usize, y: usize) -> bool {
        let Some(index) = self.index(x, y) else {
            return false;
        };
        let cell = &mut self.cells[index];
        cell.state = match cell.state {
            CellState::Hidden => CellState::Flagged,
            CellState::Flagged => CellState::Hidden,
            CellState::Revealed => return false,
        };
        true
    }

    //--- Internal Helpers -------------------------------------------------

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn neighbours(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = ((index % self.width) as isize, (index / self.width) as isize);
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (x + dx, y + dy)))
            .filter(move |&(nx, ny)| (nx, ny) != (x, y))
            .filter_map(move |(nx, ny)| {
                if nx < 0 || ny < 0 {
                    return None;
                }
                self.index(nx as usize, ny as usize)
            })
    }

    /// Partial Fisher-Yates over every cell except `safe`.
    fn place_mines(&mut self, safe: usize) {
        let mut rng = Rand32::new(self.seed);
        let mut candidates: Vec<usize> = (0..self.cells.len()).filter(|&i| i != safe).collect();

        for i in 0..self.mine_count {
            let j = i + rng.rand_range(0..(candidates.len() - i) as u32) as usize;
            candidates.swap(i, j);
            self.cells[candidates[i]].mine = true;
        }

        self.mines_placed = true;
        self.compute_adjacency();
        debug!(
            target: "minesweeper",
            "Placed {} mines on {}x{} board (seed {})",
            self.mine_count, self.width, self.height, self.seed
        );
    }

    fn compute_adjacency(&mut self) {
        for index in 0..self.cells.len() {
            let adjacent = self.neighbours(index).filter(|&n| self.cells[n].mine).count();
            self.cells[index].adjacent = adjacent as u8;
        }
    }

    fn flood_fill(&mut self, start: usize) -> usize {
        let mut opened = 0;
        let mut pending = vec![start];

        while let Some(index) = pending.pop() {
            let cell = self.cells[index];
            if cell.state != CellState::Hidden || cell.mine {
                continue;
            }
            self.cells[index].state = CellState::Revealed;
            opened += 1;

            if cell.adjacent == 0 {
                let next: Vec<usize> = self.neighbours(index).collect();
                pending.extend(next);
            }
        }
        opened
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
