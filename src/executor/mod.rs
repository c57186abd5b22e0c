mod batch;
mod dispatch;
mod pending;

pub use dispatch::Executor;
pub use pending::{Deferred, PendingOperation, PostProcess};
