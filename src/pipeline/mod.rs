// Region table processing: reading and writing rows, resolving coordinates, pacing

pub mod geolocation;
pub mod pacing;
pub mod records;
