pub mod client;
pub mod forms;
pub mod models;
pub mod page;
pub mod search;
pub mod session;
pub mod storage;
