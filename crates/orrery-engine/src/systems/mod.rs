pub mod render;
pub mod events;
