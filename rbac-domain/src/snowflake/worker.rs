use super::{Clock, Id, IdParts, SEQUENCE_MASK, SystemClock};
use crate::error::{DomainError, DomainResult};
use crate::value_object::WorkerId;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

/// 发号器内部状态，仅在持锁期间访问
#[derive(Debug, Default)]
struct WorkerState {
    last_millis: u64,
    sequence: u16,
}

/// 雪花发号器（worker）
///
/// - `next_id`/`next_ids` 可在多线程间并发调用（`&self`），内部以单把互斥锁串行化；
/// - 时钟回拨时返回 `ClockRollback`，不复用旧时间戳；
/// - 同一毫秒内序列号耗尽时自旋等待下一毫秒。
#[derive(Debug)]
pub struct IdGenerator<C = SystemClock> {
    worker_id: WorkerId,
    clock: C,
    state: Mutex<WorkerState>,
}

impl IdGenerator<SystemClock> {
    /// 使用系统时钟创建发号器，worker id 超出 [0, 1023] 时返回 `InvalidWorkerId`
    pub fn new(worker_id: i64) -> DomainResult<Self> {
        Self::with_clock(worker_id, SystemClock)
    }
}

impl<C> IdGenerator<C>
where
    C: Clock,
{
    /// 使用指定时钟源创建发号器
    pub fn with_clock(worker_id: i64, clock: C) -> DomainResult<Self> {
        let worker_id = WorkerId::new(worker_id)?;
        debug!(%worker_id, "id generator initialized");
        Ok(Self {
            worker_id,
            clock,
            state: Mutex::new(WorkerState::default()),
        })
    }

    pub fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    /// 生成一个标识
    pub fn next_id(&self) -> DomainResult<Id> {
        let mut state = self.state.lock();
        self.next_locked(&mut state)
    }

    /// 在一次持锁内按顺序生成 `n` 个标识；任一步失败则整体失败，不返回部分结果
    pub fn next_ids(&self, n: usize) -> DomainResult<Vec<Id>> {
        let mut ids = Vec::new();
        ids.try_reserve(n).map_err(|err| DomainError::InvalidValue {
            reason: format!("cannot allocate {n} ids: {err}"),
        })?;
        let mut state = self.state.lock();
        for _ in 0..n {
            ids.push(self.next_locked(&mut state)?);
        }
        Ok(ids)
    }

    fn next_locked(&self, state: &mut WorkerState) -> DomainResult<Id> {
        let mut now = self.clock.now_millis();

        if now < state.last_millis {
            warn!(
                worker_id = %self.worker_id,
                last_millis = state.last_millis,
                now_millis = now,
                "clock moved backwards, refusing to issue id"
            );
            return Err(DomainError::ClockRollback {
                last_millis: state.last_millis,
                now_millis: now,
            });
        }

        if now == state.last_millis {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                trace!(worker_id = %self.worker_id, "sequence exhausted, waiting for next millisecond");
                now = self.wait_next_millis(state.last_millis).inspect_err(|_| {
                    // 保持“本毫秒已耗尽”，避免后续调用复用已发出的序列号
                    state.sequence = SEQUENCE_MASK;
                })?;
            }
        } else {
            state.sequence = 0;
        }

        let mut id = self.compose(now, state.sequence)?;
        // 零值为保留的根标识，跳过
        if id.is_root() {
            state.sequence = 1;
            id = self.compose(now, state.sequence)?;
        }

        state.last_millis = now;
        Ok(id)
    }

    fn compose(&self, now: u64, sequence: u16) -> DomainResult<Id> {
        Id::compose(IdParts {
            timestamp_millis: now,
            worker_id: self.worker_id.value(),
            sequence,
        })
    }

    /// 自旋直到时钟越过 `last_millis`
    fn wait_next_millis(&self, last_millis: u64) -> DomainResult<u64> {
        loop {
            let now = self.clock.now_millis();
            if now > last_millis {
                return Ok(now);
            }
            if now < last_millis {
                return Err(DomainError::ClockRollback {
                    last_millis,
                    now_millis: now,
                });
            }
            std::hint::spin_loop();
        }
    }
}
