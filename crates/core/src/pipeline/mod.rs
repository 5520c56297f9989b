pub mod frames_to_video_use_case;
pub mod pipeline_logger;
