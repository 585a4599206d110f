pub mod assembly;
pub mod engine;
pub mod error;
pub mod fasta;
pub mod io;
pub mod locate;
pub mod model;
pub mod stats;
pub mod timing;
