//! Repository Layer
//!
//! Remote store abstraction and its HTTP implementation.

mod http;
mod traits;

pub use http::HttpTaskRepository;
pub use traits::TaskRepository;
