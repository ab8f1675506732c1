//! Pixel-space geometry shared by the mask resolver and the tilers.
//!
//! Every pyramid level has its own pixel space. Boxes are always expressed as
//! a [`CoordinatePair`] together with the level they live in, and moved
//! between levels with [`scale_coordinates`].

mod coords;

pub use coords::{scale_coordinates, CoordinatePair};
