pub mod storage;

pub use storage::{ChatRecord, ChatStore, SQLiteStorage};
