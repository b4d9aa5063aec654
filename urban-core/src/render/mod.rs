pub mod layers;
pub mod pipeline;
pub mod raster;
