//! Fault injection for primitive stores.
//!
//! `FaultyStore` forwards every call to an inner store unless a registered
//! [`FaultRule`] matches, in which case the call fails with
//! `StoreError::Unavailable` without reaching the inner store. Tests use it
//! to drive the engine's partial-failure paths.
//!
//! ```ignore
//! let store = Arc::new(FaultyStore::new(MemoryStore::new()));
//! store.inject(FaultRule::new(StoreOp::HDel, "borrowing").member("111"));
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::traits::PrimitiveStore;

/// Primitive operations a fault can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// `PING`
    Ping,
    /// `DEL`
    Del,
    /// `HKEYS`
    HKeys,
    /// `HVALS`
    HVals,
    /// `HGET`
    HGet,
    /// `HSET`
    HSet,
    /// `HDEL`
    HDel,
    /// `RPUSH`
    RPush,
    /// `LRANGE`
    LRange,
    /// `SADD`
    SAdd,
    /// `SREM`
    SRem,
    /// `SMEMBERS`
    SMembers,
    /// `SCARD`
    SCard,
    /// `ZADD`
    ZAdd,
    /// `ZREM`
    ZRem,
    /// `ZRANGEBYLEX`
    ZRangeLex,
}

/// A rule describing which calls fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRule {
    op: StoreOp,
    key: String,
    /// Field or member the call must name; `None` matches any
    member: Option<String>,
    /// Failures left before the rule retires; `None` never retires
    remaining: Option<usize>,
}

impl FaultRule {
    /// Fail every `op` call on `key`.
    pub fn new(op: StoreOp, key: impl Into<String>) -> Self {
        Self {
            op,
            key: key.into(),
            member: None,
            remaining: None,
        }
    }

    /// Only fail calls naming this field or member.
    pub fn member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Retire the rule after `count` failures.
    pub fn times(mut self, count: usize) -> Self {
        self.remaining = Some(count);
        self
    }

    fn matches(&self, op: StoreOp, key: &str, member: Option<&str>) -> bool {
        self.op == op
            && self.key == key
            && match &self.member {
                Some(expected) => member == Some(expected.as_str()),
                None => true,
            }
    }
}

/// Store wrapper that fails calls matching registered rules.
pub struct FaultyStore<S> {
    inner: S,
    rules: Mutex<Vec<FaultRule>>,
    offline: AtomicBool,
    injected: AtomicUsize,
}

impl<S: PrimitiveStore> FaultyStore<S> {
    /// Wrap `inner` with no faults registered.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            rules: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            injected: AtomicUsize::new(0),
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Register a fault rule.
    pub fn inject(&self, rule: FaultRule) {
        self.rules.lock().push(rule);
    }

    /// Remove every rule and bring the store back online.
    pub fn clear(&self) {
        self.rules.lock().clear();
        self.offline.store(false, Ordering::Release);
    }

    /// Fail every call while `offline` is true.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Release);
    }

    /// Number of calls failed so far.
    pub fn injected_failures(&self) -> usize {
        self.injected.load(Ordering::Acquire)
    }

    fn check(&self, op: StoreOp, key: &str, member: Option<&str>) -> StoreResult<()> {
        let tripped = self.offline.load(Ordering::Acquire) || {
            let mut rules = self.rules.lock();
            match rules.iter().position(|r| r.matches(op, key, member)) {
                Some(idx) => {
                    let retire = match rules[idx].remaining.as_mut() {
                        Some(remaining) => {
                            *remaining = remaining.saturating_sub(1);
                            *remaining == 0
                        }
                        None => false,
                    };
                    if retire {
                        rules.remove(idx);
                    }
                    true
                }
                None => false,
            }
        };

        if tripped {
            self.injected.fetch_add(1, Ordering::AcqRel);
            return Err(StoreError::unavailable(format!(
                "injected fault on {:?} {}",
                op, key
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: PrimitiveStore> PrimitiveStore for FaultyStore<S> {
    async fn ping(&self) -> StoreResult<()> {
        self.check(StoreOp::Ping, "", None)?;
        self.inner.ping().await
    }

    async fn del(&self, key: &str) -> StoreResult<bool> {
        self.check(StoreOp::Del, key, None)?;
        self.inner.del(key).await
    }

    async fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        self.check(StoreOp::HKeys, key, None)?;
        self.inner.hkeys(key).await
    }

    async fn hvals(&self, key: &str) -> StoreResult<Vec<String>> {
        self.check(StoreOp::HVals, key, None)?;
        self.inner.hvals(key).await
    }

    async fn hget(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        self.check(StoreOp::HGet, key, Some(field))?;
        self.inner.hget(key, field).await
    }

    async fn hset(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<usize> {
        let first = pairs.first().map(|(field, _)| field.as_str());
        self.check(StoreOp::HSet, key, first)?;
        self.inner.hset(key, pairs).await
    }

    async fn hdel(&self, key: &str, field: &str) -> StoreResult<bool> {
        self.check(StoreOp::HDel, key, Some(field))?;
        self.inner.hdel(key, field).await
    }

    async fn rpush(&self, key: &str, value: &str) -> StoreResult<usize> {
        self.check(StoreOp::RPush, key, Some(value))?;
        self.inner.rpush(key, value).await
    }

    async fn lrange(&self, key: &str) -> StoreResult<Vec<String>> {
        self.check(StoreOp::LRange, key, None)?;
        self.inner.lrange(key).await
    }

    async fn sadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check(StoreOp::SAdd, key, Some(member))?;
        self.inner.sadd(key, member).await
    }

    async fn srem(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check(StoreOp::SRem, key, Some(member))?;
        self.inner.srem(key, member).await
    }

    async fn smembers(&self, key: &str) -> StoreResult<Vec<String>> {
        self.check(StoreOp::SMembers, key, None)?;
        self.inner.smembers(key).await
    }

    async fn scard(&self, key: &str) -> StoreResult<usize> {
        self.check(StoreOp::SCard, key, None)?;
        self.inner.scard(key).await
    }

    async fn zadd(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check(StoreOp::ZAdd, key, Some(member))?;
        self.inner.zadd(key, member).await
    }

    async fn zrem(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.check(StoreOp::ZRem, key, Some(member))?;
        self.inner.zrem(key, member).await
    }

    async fn zrange_lex(&self, key: &str) -> StoreResult<Vec<String>> {
        self.check(StoreOp::ZRangeLex, key, None)?;
        self.inner.zrange_lex(key).await
    }
}
