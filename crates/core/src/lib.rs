pub mod pipeline;
pub mod sequence;
pub mod shared;
pub mod video;
