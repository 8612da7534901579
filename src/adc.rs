use crate::LevelSource;

/// 本地定义的阻塞式ADC读取trait。
pub trait Adc {
    type Error;
    fn read(&mut self) -> Result<u16, Self::Error>;
}

/// ADC采样滤波器的trait。
pub trait AdcFilter {
    /// 处理一个新的采样值。
    /// 如果滤波器已准备好输出一个有效值，则返回 `Some(value)`。
    /// 否则返回 `None`，表示需要更多样本。
    fn process(&mut self, new_sample: u16) -> Option<u16>;
}

pub mod filter {
    use super::*;

    /// 原始值滤波器，立即返回结果。
    #[derive(Default)]
    pub struct RawFilter;

    impl AdcFilter for RawFilter {
        fn process(&mut self, new_sample: u16) -> Option<u16> {
            Some(new_sample)
        }
    }

    /// 中位值滤波器，在采集足够样本后输出中间值。
    pub struct MedianFilter<const N: usize> {
        samples: [u16; N],
        index: usize,
    }

    impl<const N: usize> MedianFilter<N> {
        pub fn new() -> Self {
            assert!(N > 0, "MedianFilter requires at least 1 sample");
            Self {
                samples: [0; N],
                index: 0,
            }
        }
    }

    impl<const N: usize> Default for MedianFilter<N> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<const N: usize> AdcFilter for MedianFilter<N> {
        fn process(&mut self, new_sample: u16) -> Option<u16> {
            self.samples[self.index] = new_sample;
            self.index += 1;

            if self.index < N {
                // 样本还未采满
                return None;
            }

            // 样本已满，计算中位值并重置索引
            self.index = 0;
            self.samples.sort_unstable();
            Some(self.samples[N / 2])
        }
    }
}

/// 一个通过ADC阈值窗口判定按下状态的电平源。
///
/// 适用于经电阻分压读取的按钮：采样值落在窗口内视为按下。
pub struct AdcLevelSource<A: Adc, F: AdcFilter> {
    adc: A,
    filter: F,
    threshold_low: u16,
    threshold_high: u16,
}

impl<A: Adc, F: AdcFilter> AdcLevelSource<A, F> {
    /// 创建一个基于阈值窗口的ADC电平源。
    ///
    /// 采样值落在 `[threshold_low, threshold_high]` 内视为按下。
    pub fn new(adc: A, filter: F, threshold_low: u16, threshold_high: u16) -> Self {
        Self {
            adc,
            filter,
            threshold_low,
            threshold_high,
        }
    }
}

impl<A: Adc, F: AdcFilter> LevelSource for AdcLevelSource<A, F> {
    type Error = A::Error;

    fn probe(&mut self) -> Result<(), Self::Error> {
        self.adc.read().map(|_| ())
    }

    fn is_active(&mut self) -> bool {
        // 连续读取直到滤波器给出输出；MedianFilter<N> 意味着
        // 每个滴答内连续采样 N 次
        loop {
            let sample = match self.adc.read() {
                Ok(sample) => sample,
                Err(_) => return false,
            };
            if let Some(value) = self.filter.process(sample) {
                return value >= self.threshold_low && value <= self.threshold_high;
            }
        }
    }
}
