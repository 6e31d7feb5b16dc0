//! 持久化协议（persist）
//!
//! 核心只定义实体仓储接口，具体存储引擎由上层实现并注入；
//! 内置的 [`InMemoryRepository`] 供测试与演示使用（`inmemory` 特性）。
//!
#[cfg(feature = "inmemory")]
mod inmemory;
mod repository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
pub use repository::Repository;
