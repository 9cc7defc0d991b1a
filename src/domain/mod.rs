//! 领域模型：故障、技师、备件、工单
//!
//! 这些类型是「可信」的领域值；LLM 返回的原始草稿见 `planning::draft`，须经调和后才能转换为 `WorkOrder`。

pub mod fault;
pub mod part;
pub mod technician;
pub mod work_order;

pub use fault::DiagnosedFault;
pub use part::Part;
pub use technician::Technician;
pub use work_order::{Priority, RepairTask, WorkOrder, WorkOrderPartUsage, WorkOrderType};
