// grid.rs
// Uniform spatial grid used to find neighbour candidates

use smallvec::SmallVec;

use crate::particle::Particle;

/// Bucketed spatial hash over the world rectangle `[0, width] x [0, height]`.
pub struct UniformGrid {
    pub width: f64,
    pub height: f64,
    rows: usize,
    cols: usize,
    cell_w: f64,
    cell_h: f64,
    cells: Vec<SmallVec<[usize; 8]>>, // indices of particles per cell
}

impl UniformGrid {
    pub fn new(width: f64, height: f64, rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            width,
            height,
            rows,
            cols,
            cell_w: width / cols as f64,
            cell_h: height / rows as f64,
            cells: vec![SmallVec::new(); rows * cols],
        }
    }

    /// Adopt a new world size or resolution. Cells are emptied.
    pub fn resize(&mut self, width: f64, height: f64, rows: usize, cols: usize) {
        *self = Self::new(width, height, rows, cols);
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Drop every in-bounds particle into the cell under its center.
    pub fn insert(&mut self, particles: &[Particle]) {
        for (i, p) in particles.iter().enumerate() {
            if p.pos.x < 0.0 || p.pos.y < 0.0 || p.pos.x >= self.width || p.pos.y >= self.height {
                continue;
            }
            let (row, col) = (self.row(p.pos.y), self.column(p.pos.x));
            self.cells[row * self.cols + col].push(i);
        }
    }

    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        self.insert(particles);
    }

    // TODO: cap at `cols - 1` alone; the row cap folds the right part of wide grids
    // into one column. Insert and query share this function so lookups stay consistent.
    fn column(&self, x: f64) -> usize {
        let c = (x / self.cell_w).floor().max(0.0) as usize;
        c.min(self.rows - 1).min(self.cols - 1)
    }

    fn row(&self, y: f64) -> usize {
        let r = (y / self.cell_h).floor().max(0.0) as usize;
        r.min(self.rows - 1)
    }

    /// Distinct particle indices from every cell overlapping the square
    /// `(x ± half_extent, y ± half_extent)` around particle `i`, excluding `i`.
    pub fn neighbors(&self, particles: &[Particle], i: usize, half_extent: f64) -> Vec<usize> {
        let p = &particles[i];
        let (r0, r1) = (self.row(p.pos.y - half_extent), self.row(p.pos.y + half_extent));
        let (c0, c1) = (self.column(p.pos.x - half_extent), self.column(p.pos.x + half_extent));
        let mut neighbors = Vec::new();
        for row in r0..=r1 {
            for col in c0..=c1 {
                for &idx in &self.cells[row * self.cols + col] {
                    if idx != i {
                        neighbors.push(idx);
                    }
                }
            }
        }
        // Clamped columns can alias, so a cell may be visited twice.
        neighbors.sort_unstable();
        neighbors.dedup();
        neighbors
    }
}
