//! # 비활성 감지기
//!
//! 사용자 입력이 일정 시간 동안 없으면 콜백을 한 번 호출합니다.
//!
//! ## 상태 전이
//!
//! ```text
//!            입력 / extend_session()
//!              ┌──────────┐
//!              ▼          │
//! new() ──► [Armed] ──────┘
//!              │ 타이머 만료
//!              ▼
//!           [Fired] (콜백 1회, 재무장 없음)
//!
//! destroy() : 어느 상태에서든 [Destroyed] (리스너 해제, 타이머 취소)
//! ```
//!
//! 만료된 감지기는 다시 무장하지 않습니다. 소유자가 새 인스턴스를 만들어야 합니다.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::errors::errors::{SessionError, SessionResult};
use crate::services::session::activity::{ActivityHub, ActivityKind, ListenerId};

/// 만료 시 호출되는 콜백
pub type IdleCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Armed,
    Fired,
    Destroyed,
}

struct MonitorState {
    phase: Phase,
    /// 타이머 세대. 재무장할 때마다 증가하며 이전 타이머의 만료를 무시하는 데 사용
    generation: u64,
    timer: Option<JoinHandle<()>>,
    listeners: Vec<ListenerId>,
}

struct MonitorInner {
    hub: Arc<ActivityHub>,
    idle: Duration,
    callback: IdleCallback,
    runtime: Handle,
    state: Mutex<MonitorState>,
}

/// 비활성 감지기
///
/// 생성과 동시에 무장되며, [`ActivityHub`]에 캡처 단계 리스너를 등록합니다.
/// drop 시 자동으로 [`destroy`](Self::destroy)됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// let monitor = InactivityMonitor::from_minutes(hub.clone(), 30, Arc::new(|| {
///     log::info!("세션 만료");
/// }))?;
///
/// hub.dispatch(ActivityKind::KeyDown); // 타이머 재설정
/// monitor.destroy();
/// ```
pub struct InactivityMonitor {
    inner: Arc<MonitorInner>,
}

impl InactivityMonitor {
    /// 감지기를 생성하고 즉시 무장합니다.
    ///
    /// # Errors
    ///
    /// * `SessionError::InternalError` - tokio 런타임 밖에서 호출된 경우
    pub fn new(hub: Arc<ActivityHub>, idle: Duration, callback: IdleCallback) -> SessionResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| SessionError::InternalError(format!("비활성 타이머에 필요한 런타임이 없습니다: {}", e)))?;

        let inner = Arc::new(MonitorInner {
            hub,
            idle,
            callback,
            runtime,
            state: Mutex::new(MonitorState {
                phase: Phase::Armed,
                generation: 0,
                timer: None,
                listeners: Vec::new(),
            }),
        });

        let listeners = ActivityKind::ALL
            .iter()
            .map(|kind| {
                let weak = Arc::downgrade(&inner);
                inner.hub.add_listener(*kind, true, move |_| {
                    if let Some(inner) = weak.upgrade() {
                        MonitorInner::reset(&inner);
                    }
                })
            })
            .collect();

        if let Ok(mut state) = inner.state.lock() {
            state.listeners = listeners;
        }
        MonitorInner::reset(&inner);

        log::debug!("비활성 감지기 무장 - 대기 시간: {}초", idle.as_secs());
        Ok(Self { inner })
    }

    /// 분 단위 대기 시간으로 감지기를 생성합니다.
    pub fn from_minutes(hub: Arc<ActivityHub>, minutes: u64, callback: IdleCallback) -> SessionResult<Self> {
        Self::new(hub, Duration::from_secs(minutes.saturating_mul(60)), callback)
    }

    /// 사용자 입력이 있었던 것처럼 타이머를 재설정합니다.
    ///
    /// 만료되었거나 해제된 감지기에서는 아무것도 하지 않습니다.
    pub fn extend_session(&self) {
        MonitorInner::reset(&self.inner);
    }

    /// 리스너를 해제하고 대기 중인 타이머를 취소합니다. 여러 번 호출해도 안전합니다.
    pub fn destroy(&self) {
        let listeners = match self.inner.state.lock() {
            Ok(mut state) => {
                if state.phase == Phase::Destroyed {
                    return;
                }
                state.phase = Phase::Destroyed;
                if let Some(timer) = state.timer.take() {
                    timer.abort();
                }
                std::mem::take(&mut state.listeners)
            }
            Err(_) => return,
        };

        for id in listeners {
            self.inner.hub.remove_listener(id);
        }
        log::debug!("비활성 감지기 해제");
    }

    /// 무장 상태 여부
    pub fn is_armed(&self) -> bool {
        self.inner.phase() == Some(Phase::Armed)
    }

    /// 만료되어 콜백을 호출했는지 여부
    pub fn is_spent(&self) -> bool {
        self.inner.phase() == Some(Phase::Fired)
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl MonitorInner {
    fn phase(&self) -> Option<Phase> {
        self.state.lock().ok().map(|state| state.phase)
    }

    /// 기존 타이머를 취소하고 새 타이머를 예약합니다.
    fn reset(inner: &Arc<Self>) {
        let Ok(mut state) = inner.state.lock() else {
            return;
        };
        if state.phase != Phase::Armed {
            return;
        }

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);

        let generation = state.generation;
        let idle = inner.idle;
        let weak: Weak<Self> = Arc::downgrade(inner);
        state.timer = Some(inner.runtime.spawn(async move {
            tokio::time::sleep(idle).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire(generation);
            }
        }));
    }

    fn fire(&self, generation: u64) {
        let listeners = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            if state.phase != Phase::Armed || state.generation != generation {
                return;
            }
            state.phase = Phase::Fired;
            state.timer = None;
            std::mem::take(&mut state.listeners)
        };

        for id in listeners {
            self.hub.remove_listener(id);
        }

        log::info!("⏰ 사용자 비활성으로 세션 만료 - 대기 시간: {}초", self.idle.as_secs());
        (self.callback)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_callback() -> (Arc<AtomicUsize>, IdleCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        (count, Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_exactly_once() {
        let hub = ActivityHub::new();
        let (count, callback) = counting_callback();
        let monitor = InactivityMonitor::from_minutes(hub.clone(), 1, callback).unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(monitor.is_spent());

        // 만료 후 입력이 있어도 재무장하지 않음
        hub.dispatch(ActivityKind::KeyDown);
        monitor.extend_session();
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interaction_resets_timer() {
        let hub = ActivityHub::new();
        let (count, callback) = counting_callback();
        let _monitor = InactivityMonitor::new(hub.clone(), Duration::from_secs(60), callback).unwrap();

        tokio::time::sleep(Duration::from_secs(40)).await;
        hub.dispatch(ActivityKind::MouseMove);
        tokio::time::sleep(Duration::from_secs(40)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extend_session_resets_timer() {
        let hub = ActivityHub::new();
        let (count, callback) = counting_callback();
        let monitor = InactivityMonitor::new(hub, Duration::from_secs(60), callback).unwrap();

        tokio::time::sleep(Duration::from_secs(50)).await;
        monitor.extend_session();
        tokio::time::sleep(Duration::from_secs(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(monitor.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_destroy_is_idempotent_and_cancels() {
        let hub = ActivityHub::new();
        let (count, callback) = counting_callback();
        let monitor = InactivityMonitor::new(hub.clone(), Duration::from_secs(60), callback).unwrap();
        assert_eq!(hub.listener_count(), ActivityKind::ALL.len());

        monitor.destroy();
        monitor.destroy();
        assert_eq!(hub.listener_count(), 0);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!monitor.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_listeners() {
        let hub = ActivityHub::new();
        let (count, callback) = counting_callback();
        {
            let _monitor = InactivityMonitor::new(hub.clone(), Duration::from_secs(10), callback).unwrap();
        }
        assert_eq!(hub.listener_count(), 0);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_requires_runtime() {
        let (_, callback) = counting_callback();
        let result = InactivityMonitor::new(ActivityHub::new(), Duration::from_secs(1), callback);
        assert!(matches!(result, Err(SessionError::InternalError(_))));
    }
}
