pub mod color_region;
pub mod detection;
pub mod filter;
