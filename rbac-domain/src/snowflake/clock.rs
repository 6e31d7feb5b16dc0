use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 毫秒时钟源
pub trait Clock: Send + Sync {
    /// 当前 Unix 毫秒时间戳
    fn now_millis(&self) -> u64;
}

impl<C> Clock for Arc<C>
where
    C: Clock + ?Sized,
{
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// 系统墙钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // 早于 1970 的系统时间按 0 处理，随后由发号器报告越界
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// 手动时钟，供测试与回放场景使用
///
/// `step` 非零时，每次读取后自动前进 `step` 毫秒。
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
    step: AtomicU64,
}

impl ManualClock {
    pub fn new(now_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(now_millis),
            step: AtomicU64::new(0),
        }
    }

    /// 每次读取后自动前进 `step` 毫秒
    pub fn with_step(self, step: u64) -> Self {
        self.step.store(step, Ordering::SeqCst);
        self
    }

    pub fn set(&self, now_millis: u64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        let step = self.step.load(Ordering::SeqCst);
        self.now.fetch_add(step, Ordering::SeqCst)
    }
}
