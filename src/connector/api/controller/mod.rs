pub mod history_controller;
pub mod invoke_controller;

pub use history_controller::HistoryController;
pub use invoke_controller::InvokeController;
