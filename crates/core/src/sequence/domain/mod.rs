pub mod frame_source;
pub mod natural_order;
