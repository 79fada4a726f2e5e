pub mod app;
pub mod file_picker;
pub mod player;
