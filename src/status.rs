use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::Error;

/// 一次按键事件的分类结果。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPress {
    /// 没有待处理的事件。
    None,
    /// 短按：越过短按阈值后、长按阈值之前松开。
    Short,
    /// 长按：持续按住直到长按阈值。
    Long,
}

/// 指向一个已注册输入的不透明句柄，由 [`register`] 返回。
///
/// [`register`]: crate::DebounceEngine::register
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputHandle(pub(crate) usize);

#[derive(Clone, Copy)]
struct SlotState {
    registered: bool,
    auto_acknowledge: bool,
    short: bool,
    long: bool,
}

impl SlotState {
    const IDLE: Self = Self {
        registered: false,
        auto_acknowledge: false,
        short: false,
        long: false,
    };
}

/// 单个输入的事件槽。
///
/// 滴答上下文置位事件标志，应用上下文读取并清除它们；
/// 每个槽有自己的临界区，互不阻塞。
pub(crate) struct EventSlot {
    state: Mutex<CriticalSectionRawMutex, Cell<SlotState>>,
}

impl EventSlot {
    const fn new() -> Self {
        Self {
            state: Mutex::new(Cell::new(SlotState::IDLE)),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut SlotState) -> R) -> R {
        self.state.lock(|cell| {
            let mut state = cell.get();
            let result = f(&mut state);
            cell.set(state);
            result
        })
    }

    /// 是否有尚未确认的事件。
    pub(crate) fn pending(&self) -> bool {
        self.state.lock(|cell| {
            let state = cell.get();
            state.short || state.long
        })
    }

    /// 置位一个事件标志。只在滴答上下文中调用。
    pub(crate) fn raise(&self, press: ButtonPress) {
        self.update(|state| match press {
            ButtonPress::Short => state.short = true,
            ButtonPress::Long => state.long = true,
            ButtonPress::None => {}
        });
    }
}

/// 【事件查询端】固定容量的事件槽集合，在滴答任务与应用逻辑之间共享。
///
/// 通常放在 `static` 中，由 [`DebounceEngine`](crate::DebounceEngine)
/// 与应用代码同时持有引用。
pub struct EventBank<const N: usize> {
    slots: [EventSlot; N],
}

impl<const N: usize> EventBank<N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { EventSlot::new() }; N],
        }
    }

    /// 查询一个输入当前待处理的事件。
    ///
    /// 两个标志同时置位时长按优先。若该输入配置了自动确认，
    /// 读取与清除在同一个临界区内完成。
    ///
    /// # 错误
    /// * [`Error::InvalidHandle`]: 句柄对应的槽位从未被注册。
    pub fn check_status(&self, handle: InputHandle) -> Result<ButtonPress, Error> {
        self.with_registered(handle, |state| {
            let press = if state.long {
                ButtonPress::Long
            } else if state.short {
                ButtonPress::Short
            } else {
                ButtonPress::None
            };
            if state.auto_acknowledge && press != ButtonPress::None {
                state.short = false;
                state.long = false;
            }
            press
        })
    }

    /// 无条件清除两个事件标志，让输入回到可分类状态。
    ///
    /// 不会重置冷却计数，事件后的冷却窗口照常生效。
    /// 没有待处理事件时本调用是无害的空操作。
    pub fn acknowledge(&self, handle: InputHandle) -> Result<(), Error> {
        self.with_registered(handle, |state| {
            state.short = false;
            state.long = false;
        })
    }

    /// 设置该输入的自动确认行为，注册之后也可以随时更改。
    pub fn set_auto_acknowledge(&self, handle: InputHandle, enabled: bool) -> Result<(), Error> {
        self.with_registered(handle, |state| state.auto_acknowledge = enabled)
    }

    /// 标记一个槽位已被注册。由引擎在注册路径上调用。
    pub(crate) fn attach(&self, index: usize, auto_acknowledge: bool) -> InputHandle {
        self.slots[index].update(|state| {
            state.registered = true;
            state.auto_acknowledge = auto_acknowledge;
        });
        InputHandle(index)
    }

    pub(crate) fn slots(&self) -> &[EventSlot] {
        &self.slots
    }

    fn with_registered<R>(
        &self,
        handle: InputHandle,
        f: impl FnOnce(&mut SlotState) -> R,
    ) -> Result<R, Error> {
        let slot = self.slots.get(handle.0).ok_or(Error::InvalidHandle)?;
        slot.state.lock(|cell| {
            let mut state = cell.get();
            if !state.registered {
                return Err(Error::InvalidHandle);
            }
            let result = f(&mut state);
            cell.set(state);
            Ok(result)
        })
    }
}
