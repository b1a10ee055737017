//! Generation container, color rasters and terrain classification

pub mod cell_grid;
pub mod raster;
pub mod terrain;

// Re-export main types
pub use cell_grid::*;
pub use raster::*;
pub use terrain::*;
