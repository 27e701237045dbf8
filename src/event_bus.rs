//! 会话观察者注册表
//!
//! 表现层通过回调订阅会话变化：
//! - 变化回调没有参数，在每次状态改变后调用，观察者自行重新读取网格和实体
//! - 结束回调在胜负确定时恰好调用一次，参数为是否胜利
//!
//! 回调按注册顺序同步执行。

use std::fmt;

/// 订阅句柄，用于取消订阅
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type ChangeListener = Box<dyn FnMut()>;
pub type EndListener = Box<dyn FnMut(bool)>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    change_listeners: Vec<(ListenerId, ChangeListener)>,
    end_listeners: Vec<(ListenerId, EndListener)>,
    /// 结束通知是否已经发出
    ended: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// 订阅状态变化通知
    pub fn subscribe_changes(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.change_listeners.push((id, Box::new(listener)));
        id
    }

    /// 订阅胜负通知
    pub fn subscribe_end(&mut self, listener: impl FnMut(bool) + 'static) -> ListenerId {
        let id = self.allocate_id();
        self.end_listeners.push((id, Box::new(listener)));
        id
    }

    /// 取消订阅，返回是否找到该订阅
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriber_count();
        self.change_listeners.retain(|(listener_id, _)| *listener_id != id);
        self.end_listeners.retain(|(listener_id, _)| *listener_id != id);
        self.subscriber_count() != before
    }

    pub fn notify_changed(&mut self) {
        for (_, listener) in self.change_listeners.iter_mut() {
            listener();
        }
    }

    /// 发出胜负通知，重复调用不会再次触发
    pub fn notify_end(&mut self, victory: bool) -> bool {
        if self.ended {
            return false;
        }
        self.ended = true;
        for (_, listener) in self.end_listeners.iter_mut() {
            listener(victory);
        }
        true
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    pub fn subscriber_count(&self) -> usize {
        self.change_listeners.len() + self.end_listeners.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("change_listeners", &self.change_listeners.len())
            .field("end_listeners", &self.end_listeners.len())
            .field("ended", &self.ended)
            .finish()
    }
}
