pub mod export;
pub mod image_io;
pub mod paths;
pub mod raster;
pub mod sidecar;
