pub mod exchange;
pub mod pipeline;
pub mod vision;
