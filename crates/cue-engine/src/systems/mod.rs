pub mod render;
pub mod debug;
pub mod lighting;
