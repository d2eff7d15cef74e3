// src/lib.rs
//
// Core of the POSCAR tools: structure model, file format, coordinate
// conversion, random displacement and symmetry analysis.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod physics;
pub mod tools;
pub mod utils;

pub use error::{FailResult, StructureError, SymmetryError};
pub use model::{CoordinateMode, Species, Structure};
