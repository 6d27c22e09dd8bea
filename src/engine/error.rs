// ==========================================
// 晶圆厂产能分析引擎 - 引擎错误类型
// ==========================================
// 职责: 四类分析错误 (校验 / 数据不足 / 样本不足 / 不可行)
// 红线: 错误必须带足定位信息 (表 / 列 / 行 / 约束)，不得吞掉或转成默认值
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 分析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// 输入表格式或取值非法 (在任何模型运行前拒绝)
    #[error("数据校验失败: table={table}, column={column}, row={row:?}: {message}")]
    Validation {
        table: String,
        column: String,
        /// 数据行号 (1 起，不含表头)；表级错误为 None
        row: Option<usize>,
        message: String,
    },

    /// 历史数据为空或过短
    #[error("数据不足: {subject}: {message}")]
    InsufficientData { subject: String, message: String },

    /// 蒙特卡洛试验次数低于最小样本量
    #[error("样本量不足: iterations={requested}, 最小要求={minimum}")]
    InsufficientSample { requested: usize, minimum: usize },

    /// 优化约束无可行解
    #[error("约束不可行: constraint={constraint}: {message}")]
    Infeasible { constraint: String, message: String },
}

impl AnalysisError {
    /// 构造校验错误
    pub fn validation(
        table: &str,
        column: &str,
        row: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        AnalysisError::Validation {
            table: table.to_string(),
            column: column.to_string(),
            row,
            message: message.into(),
        }
    }

    /// 构造数据不足错误
    pub fn insufficient_data(subject: &str, message: impl Into<String>) -> Self {
        AnalysisError::InsufficientData {
            subject: subject.to_string(),
            message: message.into(),
        }
    }

    /// 错误类别代码
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation { .. } => ErrorKind::Validation,
            AnalysisError::InsufficientData { .. } => ErrorKind::InsufficientData,
            AnalysisError::InsufficientSample { .. } => ErrorKind::InsufficientSample,
            AnalysisError::Infeasible { .. } => ErrorKind::Infeasible,
        }
    }
}

/// 错误类别 (报告序列化用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    InsufficientData,
    InsufficientSample,
    Infeasible,
}

/// Result 类型别名
pub type AnalysisResult<T> = Result<T, AnalysisError>;
