pub mod complaint_handler;
pub mod console_handler;

pub use complaint_handler::*;
pub use console_handler::*;
