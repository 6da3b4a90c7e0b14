pub mod app;
pub mod async_bridge;
pub mod event;
pub mod run;
pub mod screens;
pub mod ui;
pub mod widgets;

pub use run::run;
