//! Export formats for presentation collaborators.

pub mod csv_export;
