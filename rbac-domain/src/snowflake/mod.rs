//! 雪花算法发号器（snowflake）
//!
//! 64 位标识布局（最高位恒为 0）：
//!
//! ```text
//!  63 | 62 ............ 22 | 21 ...... 12 | 11 ...... 0
//!   0 | 毫秒时间戳（41 位） | worker（10） | 序列号（12）
//! ```
//!
//! - 时间戳为距固定纪元 [`EPOCH_MILLIS`] 的毫秒数，可用约 69 年；
//! - worker id 区分同时运行的多个发号器实例；
//! - 序列号在同一毫秒内自增，毫秒推进后归零。
//!
//! 发号器通过 [`IdGenerator::new`] 显式构造并由调用方传递，不存在进程级单例。
//!
mod clock;
mod id;
mod worker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use id::{Id, IdParts};
pub use worker::IdGenerator;

/// 固定纪元：2016-09-25T11:28:08Z（Unix 毫秒）
pub const EPOCH_MILLIS: u64 = 1_474_802_888_000;

pub const TIMESTAMP_BITS: u32 = 41;
pub const WORKER_ID_BITS: u32 = 10;
pub const SEQUENCE_BITS: u32 = 12;

pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;

pub const MAX_WORKER_ID: u16 = (1 << WORKER_ID_BITS) - 1;
pub const SEQUENCE_MASK: u16 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_TIMESTAMP_OFFSET: u64 = (1 << TIMESTAMP_BITS) - 1;
