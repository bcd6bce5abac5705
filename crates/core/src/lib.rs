//! Core business logic for agora.

pub mod pagination;
pub mod resolver;
pub mod services;
pub mod thread;

pub use pagination::Page;
pub use resolver::{EntityResolver, RepositoryResolver, SharedResolver};
pub use services::*;
pub use thread::{CommentNode, MAX_THREAD_DEPTH, ThreadItem, build_tree};
