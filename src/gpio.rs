use crate::LevelSource;
use embedded_hal::digital::InputPin;

/// 定义GPIO按钮的有效电平。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

/// 一个直接由GPIO输入引脚采样的电平源。
///
/// 它是最简单的电平源，封装了一个 `InputPin`，
/// 并实现了 `LevelSource` trait。
pub struct GpioLevelSource<P: InputPin> {
    pin: P,
    active_level: ActiveLevel,
}

impl<P: InputPin> GpioLevelSource<P> {
    /// 创建一个新的GPIO电平源。
    ///
    /// # 参数
    /// * `pin`: 一个实现了 `InputPin` 的GPIO引脚。
    /// * `active_level`: 定义了按钮按下时的有效电平 (`ActiveLevel::Low` 或 `ActiveLevel::High`)。
    pub fn new(pin: P, active_level: ActiveLevel) -> Self {
        Self { pin, active_level }
    }
}

impl<P: InputPin> LevelSource for GpioLevelSource<P> {
    type Error = P::Error;

    fn probe(&mut self) -> Result<(), Self::Error> {
        self.pin.is_high().map(|_| ())
    }

    fn is_active(&mut self) -> bool {
        match self.active_level {
            ActiveLevel::Low => self.pin.is_low().unwrap_or(false),
            ActiveLevel::High => self.pin.is_high().unwrap_or(false),
        }
    }
}
