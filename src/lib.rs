#![no_std]

pub mod adc;
pub mod config;
pub mod gpio;
pub mod status;

pub use config::*;
pub use status::{ButtonPress, EventBank, InputHandle};

use embassy_time::Ticker;
use heapless::Vec;

use crate::config::DebounceConfig;
use crate::status::EventSlot;

/// 一个trait，抽象了所有可以按滴答采样“当前电平”的硬件源。
///
/// `probe` 在注册时调用一次，验证该线路可寻址、可读取；
/// `is_active` 在滴答路径上调用，不允许失败（读取错误按未按下处理）。
pub trait LevelSource {
    type Error;

    fn probe(&mut self) -> Result<(), Self::Error>;
    fn is_active(&mut self) -> bool;
}

/// 注册与查询接口可能返回的错误。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// 电平源拒绝了注册时的探测，线路不可读。
    InvalidSource,
    /// 注册表已满，没有空余槽位。
    AllocationFailed,
    /// 句柄不属于任何已注册的输入。
    InvalidHandle,
}

struct TrackedInput<S> {
    source: S,
    debounce_counter: u16,
    provisional_short: bool,
    dead_time: u16,
}

impl<S: LevelSource> TrackedInput<S> {
    /// 推进一个输入的状态机一个滴答。
    fn advance(&mut self, slot: &EventSlot, config: &DebounceConfig) {
        // 事件尚未被应用确认，输入保持锁定
        if slot.pending() {
            return;
        }
        // 冷却窗口内忽略一切电平变化
        if self.dead_time > 0 {
            self.dead_time -= 1;
            return;
        }

        let pressed = self.source.is_active();
        let counter = self.debounce_counter;

        if counter == 0 {
            if pressed {
                self.debounce_counter = 1;
            }
        } else if counter == config.short_press_ticks {
            if pressed {
                self.provisional_short = true;
            }
            self.debounce_counter += 1;
        } else if counter == config.mid_ticks() {
            if self.provisional_short && !pressed {
                // 越过短按检查点后已松开，按短按结算
                self.finalize(slot, ButtonPress::Short, config.short_dead_ticks);
            } else {
                self.debounce_counter += 1;
            }
        } else if counter == config.long_press_ticks {
            if pressed {
                self.finalize(slot, ButtonPress::Long, config.long_dead_ticks);
            } else if self.provisional_short {
                // 中点之后、长按阈值之前松开且未再按下：仍算一次短按
                self.finalize(slot, ButtonPress::Short, config.short_dead_ticks);
            } else {
                self.debounce_counter = 0;
            }
        } else {
            // 两个检查点之间，继续计数
            self.debounce_counter += 1;
        }
    }

    fn finalize(&mut self, slot: &EventSlot, press: ButtonPress, dead_ticks: u16) {
        slot.raise(press);
        self.dead_time = dead_ticks;
        self.debounce_counter = 0;
        self.provisional_short = false;
    }
}

/// 【滴答驱动器】拥有全部已注册输入的状态机，按固定周期推进它们。
///
/// 事件通过共享的 [`EventBank`] 交给应用侧，本结构体自身则被
/// spawn 到滴答任务中运行。
pub struct DebounceEngine<'a, S: LevelSource, const N: usize> {
    inputs: Vec<TrackedInput<S>, N>,
    events: &'a EventBank<N>,
    config: DebounceConfig,
}

impl<'a, S: LevelSource, const N: usize> DebounceEngine<'a, S, N> {
    /// 创建一个新的去抖引擎。
    ///
    /// `events` 通常是一个 `static` 的 [`EventBank`]，应用代码
    /// 之后通过它查询和确认事件。
    pub fn new(events: &'a EventBank<N>, config: DebounceConfig) -> Self {
        debug_assert!(config.long_press_ticks > config.short_press_ticks);
        Self {
            inputs: Vec::new(),
            events,
            config,
        }
    }

    /// 注册一个新的输入线。
    ///
    /// 返回的句柄在输入的整个生命周期内保持有效，用于之后所有的
    /// 查询与确认调用。没有注销操作；注册必须全部在
    /// [`run`](Self::run) 之前完成。
    ///
    /// # 错误
    /// * [`Error::InvalidSource`]: 电平源探测失败。
    /// * [`Error::AllocationFailed`]: 已注册的输入达到容量 `N`。
    pub fn register(
        &mut self,
        mut source: S,
        auto_acknowledge: bool,
    ) -> Result<InputHandle, Error> {
        source.probe().map_err(|_| Error::InvalidSource)?;

        let index = self.inputs.len();
        self.inputs
            .push(TrackedInput {
                source,
                debounce_counter: 0,
                provisional_short: false,
                dead_time: 0,
            })
            .map_err(|_| Error::AllocationFailed)?;

        Ok(self.events.attach(index, auto_acknowledge))
    }

    /// 推进一个滴答：按注册顺序遍历所有输入，每个输入恰好处理一次。
    ///
    /// 滴答源通常是 [`run`](Self::run)；使用外部定时器（例如定时器
    /// 中断回调）时也可以按 [`TICK_INTERVAL`] 周期直接调用本方法。
    pub fn tick(&mut self) {
        for (input, slot) in self.inputs.iter_mut().zip(self.events.slots()) {
            input.advance(slot, &self.config);
        }
    }

    /// 以 [`TICK_INTERVAL`] 为周期持续推进状态机，需要被 spawn 到
    /// 后台任务中运行。
    pub async fn run(mut self) -> ! {
        let mut ticker = Ticker::every(TICK_INTERVAL);
        loop {
            ticker.next().await;
            self.tick();
        }
    }
}
