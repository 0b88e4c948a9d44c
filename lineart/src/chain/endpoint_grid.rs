use glam::{DVec3};
use smallvec::*;

use std::collections::{HashMap};

///
/// Spatial hash of chain endpoints, used to find the endpoints near a position
///
/// The cell size must be at least as large as the search distance, so that every endpoint within the distance is in one
/// of the 27 cells around the search position.
///
pub struct EndpointGrid {
    cell_size:  f64,
    cells:      HashMap<(i64, i64, i64), SmallVec<[u32; 4]>>,
}

impl EndpointGrid {
    ///
    /// Creates an empty grid
    ///
    pub fn new(cell_size: f64) -> EndpointGrid {
        EndpointGrid {
            cell_size:  if cell_size > 0.0 { cell_size } else { 1.0 },
            cells:      HashMap::new(),
        }
    }

    #[inline]
    fn cell(&self, pos: DVec3) -> (i64, i64, i64) {
        let cell = (pos / self.cell_size).floor();
        (cell.x as i64, cell.y as i64, cell.z as i64)
    }

    ///
    /// Adds an endpoint to the grid
    ///
    pub fn insert(&mut self, pos: DVec3, id: u32) {
        let cell = self.cell(pos);
        self.cells.entry(cell).or_insert_with(|| smallvec![]).push(id);
    }

    ///
    /// Returns the IDs of the endpoints in the cells around a position (this includes endpoints further away than the cell size)
    ///
    pub fn nearby<'a>(&'a self, pos: DVec3) -> impl 'a + Iterator<Item=u32> {
        let (x, y, z) = self.cell(pos);

        (-1..=1).flat_map(move |dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (x+dx, y+dy, z+dz))))
            .flat_map(move |cell| self.cells.get(&cell).into_iter().flatten().copied())
    }
}
