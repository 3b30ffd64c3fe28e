pub mod actor;
pub mod canvas;
pub mod color;
