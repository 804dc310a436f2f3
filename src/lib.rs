pub mod analysis;
pub mod artifact;
pub mod cli;
pub mod ctx;
pub mod io;
pub mod math;
pub mod model;
pub mod params;
pub mod pipeline;
pub mod plot;
pub mod schema;
pub mod sim;
