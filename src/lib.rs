//! Materia - 班级报名子系统
//!
//! 通过邀请码完成班级报名的进程内库：邀请码签发与校验、
//! 报名记录的创建与状态流转、以及带实时订阅的读穿缓存。
//!
//! # 架构
//! - `cache`: 报名缓存层（读穿 + 实时订阅）
//! - `config`: 配置管理
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `services`: 业务逻辑层（邀请码注册表 / 报名管理器）
//! - `store`: 文档存储抽象层
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;
