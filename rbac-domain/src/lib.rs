//! RBAC 领域核心（rbac-domain）
//!
//! 为每个持久化实体分配全局唯一、按时间有序的 64 位标识，并把实体组织为
//! 基于角色的访问控制（RBAC）层级：
//! - 雪花发号器（`snowflake`）：并发安全、拒绝时钟回拨、支持批量发号
//! - 实体基础（`entity`）与具体模型（`model`）：用户、权限、角色及其分组
//! - 层级结构（`hierarchy`）：分组森林、独占归属、角色关联与读取视图
//! - 规范序列化（`canonical`）：时间戳统一渲染为 `"YYYY-MM-DD HH:MM:SS"`
//! - 仓储协议（`persist`）与启动配置（`config`）
//!
//! 核心不包含传输协议与存储引擎，由上层实现并通过 `persist::Repository` 注入。
//!
//! 典型用法：
//! 1. 由 `config::Settings` 构造发号器，并以 `Arc` 共享给仓储；
//! 2. 创建实体（标识可由发号器给出，或留零由仓储首次保存时分配）；
//! 3. 通过 `hierarchy::Directory` 建立分组、归属与关联；
//! 4. 使用 `canonical::serialize` 输出视图。
//!
pub mod canonical;
pub mod config;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod persist;
pub mod snowflake;
pub mod value_object;

// 允许在本 crate 内部通过 ::rbac_domain 进行自引用，
// 以便过程宏生成的路径在本 crate 中也能解析。
extern crate self as rbac_domain;

pub use error::{DomainError, DomainResult};
pub use snowflake::{Id, IdGenerator};
