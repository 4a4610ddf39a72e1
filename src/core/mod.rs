pub mod selector;

pub use selector::{ReplyResult, ResponseSelector};
