// ==========================================
// 晶圆厂产能分析引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 导入错误统一折算为 AnalysisError::Validation 交给调用方
// ==========================================

use crate::engine::error::AnalysisError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    // ===== 表结构错误 =====
    #[error("缺少必需列 (表 {table}): {column}")]
    MissingColumn { table: String, column: String },

    // ===== 数据行错误 =====
    #[error("CSV 解析失败 (表 {table}, 行 {row}, 列 {column}): {message}")]
    CsvParseError {
        table: String,
        row: usize,
        column: String,
        message: String,
    },
}

impl ImportError {
    pub fn read_failed(path: &std::path::Path, message: impl ToString) -> Self {
        ImportError::FileReadError {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl From<ImportError> for AnalysisError {
    fn from(e: ImportError) -> Self {
        match e {
            ImportError::MissingColumn { table, column } => {
                AnalysisError::validation(&table, &column, None, "缺少必需列")
            }
            ImportError::CsvParseError {
                table,
                row,
                column,
                message,
            } => AnalysisError::validation(&table, &column, Some(row), message),
            ImportError::FileNotFound(path) => {
                AnalysisError::validation(&path, "*", None, "文件不存在")
            }
            ImportError::FileReadError { path, message } => {
                AnalysisError::validation(&path, "*", None, message)
            }
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
