pub mod history;
pub mod user;

pub use history::{format_file_size, HistoryEntryResponse, HistoryRecord};
pub use user::{User, UserResponse};
