//! HWSystem Assessment - 作业评测引擎
//!
//! 作业从创建、学生提交到最终评分的完整生命周期，以及成绩台账的加权平均统计。
//!
//! # 架构
//! - `cache`: 作业策略缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `models`: 业务数据模型
//! - `runtime`: 运行时生命周期管理
//! - `services`: 评测引擎各组件
//! - `storage`: 数据存储层（SeaORM）与附件存储
//! - `utils`: 时钟、校验等工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
