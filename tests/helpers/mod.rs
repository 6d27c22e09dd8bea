// ==========================================
// 集成测试共享辅助模块
// ==========================================

#![allow(dead_code)]

pub mod fab_data_builder;

pub use fab_data_builder::*;
