//! 成绩相关的纯规则：加权平均、状态分类、批改人分配
//!
//! 这里不访问存储，服务层把查询结果喂进来。

pub mod final_grade;
pub mod load_balance;
pub mod status;

pub use final_grade::{HypothesisRow, hypothesize, weighted_average};
pub use load_balance::pick_least_loaded;
pub use status::{StudentStatus, progress_status};
