//! 사용자 상호작용 이벤트 허브
//!
//! 문서(document) 수준의 이벤트 대상과 같은 역할을 합니다.
//! UI 계층은 포인터/키/스크롤/터치 입력을 [`ActivityHub::dispatch`]로 전달하고,
//! [`InactivityMonitor`](super::inactivity_monitor::InactivityMonitor)는
//! 캡처 단계 리스너로 등록해 입력을 관찰합니다.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// 관찰 대상 상호작용 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityKind {
    PointerDown,
    MouseMove,
    KeyDown,
    Scroll,
    TouchStart,
    Click,
}

impl ActivityKind {
    /// 비활성 감지에 사용하는 전체 이벤트 종류
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::PointerDown,
        ActivityKind::MouseMove,
        ActivityKind::KeyDown,
        ActivityKind::Scroll,
        ActivityKind::TouchStart,
        ActivityKind::Click,
    ];
}

/// 리스너 등록 핸들
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Handler = Arc<dyn Fn(ActivityKind) + Send + Sync>;

struct Listener {
    kind: ActivityKind,
    capture: bool,
    handler: Handler,
}

/// 상호작용 이벤트 허브
#[derive(Default)]
pub struct ActivityHub {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<ListenerId, Listener>>,
}

impl ActivityHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 리스너를 등록하고 해제용 핸들을 반환합니다.
    pub fn add_listener<F>(&self, kind: ActivityKind, capture: bool, handler: F) -> ListenerId
    where
        F: Fn(ActivityKind) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.insert(
                id,
                Listener {
                    kind,
                    capture,
                    handler: Arc::new(handler),
                },
            );
        }
        id
    }

    /// 리스너를 해제합니다. 이미 해제된 핸들이면 아무것도 하지 않습니다.
    pub fn remove_listener(&self, id: ListenerId) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.remove(&id);
        }
    }

    /// 이벤트를 전달합니다. 캡처 단계 리스너가 먼저 호출됩니다.
    pub fn dispatch(&self, kind: ActivityKind) {
        // 핸들러 안에서 등록/해제할 수 있도록 잠금 밖에서 호출
        let handlers: Vec<Handler> = match self.listeners.lock() {
            Ok(listeners) => {
                let matching = listeners.values().filter(|l| l.kind == kind);
                let (capture, bubble): (Vec<&Listener>, Vec<&Listener>) =
                    matching.partition(|l| l.capture);
                capture
                    .into_iter()
                    .chain(bubble)
                    .map(|l| l.handler.clone())
                    .collect()
            }
            Err(_) => return,
        };

        for handler in handlers {
            handler(kind);
        }
    }

    /// 등록된 리스너 수
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}
