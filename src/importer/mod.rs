// ==========================================
// 晶圆厂产能分析引擎 - 导入层
// ==========================================
// 职责: 读取五张 CSV 输入表，并在模型运行前完成取值校验
// ==========================================

pub mod error;
pub mod table_loader;
pub mod validator;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use table_loader::{tables, FabDataset, TableLoader};
pub use validator::InputValidator;
