pub mod commands;
pub mod completions;
pub mod render;
pub mod run;
