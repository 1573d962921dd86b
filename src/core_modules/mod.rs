pub mod color_namer;
pub mod color_sample;
pub mod frame_sampler;
pub mod ids;
pub mod palette_builder;
pub mod records;
