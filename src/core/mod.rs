//! 核心层：错误类型、取消与关闭、组件装配

pub mod builder;
pub mod error;
pub mod shutdown;

pub use builder::PlannerBuilder;
pub use error::PlanningError;
pub use shutdown::{cancellable, ShutdownManager};
