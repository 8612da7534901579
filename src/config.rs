use embassy_time::Duration;

/// 滴答周期。所有阈值都以滴答数为单位，基于这个固定周期。
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// 按滴答数表示的去抖与分类参数。
///
/// 这个结构体允许用户精细调整各种时长相关的行为，
/// 例如短按/长按的分界和事件后的冷却窗口。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// 短按阈值（滴答数）。
    ///
    /// 电平必须至少持续到这个检查点，松开后才可能被记为一次短按；
    /// 更短的活动只被视为抖动，不产生任何事件。
    pub short_press_ticks: u16,

    /// 长按阈值（滴答数）。
    ///
    /// 按住越过这个检查点即产生长按事件。
    pub long_press_ticks: u16,

    /// 短按事件结算后的冷却窗口（滴答数），期间忽略一切电平变化。
    pub short_dead_ticks: u16,

    /// 长按事件结算后的冷却窗口（滴答数）。
    pub long_dead_ticks: u16,
}

impl DebounceConfig {
    /// 临时分类检查点：短按标志在这里与“已松开”一起结算为短按。
    pub(crate) fn mid_ticks(&self) -> u16 {
        (self.long_press_ticks - self.short_press_ticks) / 2 + self.short_press_ticks
    }
}

impl Default for DebounceConfig {
    /// 提供一套合理的默认配置（10ms 滴答下）。
    ///
    /// - 短按阈值: 10 滴答 (100ms)
    /// - 长按阈值: 100 滴答 (1000ms)
    /// - 短按冷却: 5 滴答 (50ms)
    /// - 长按冷却: 10 滴答 (100ms)
    fn default() -> Self {
        Self {
            short_press_ticks: 10,
            long_press_ticks: 100,
            short_dead_ticks: 5,
            long_dead_ticks: 10,
        }
    }
}
