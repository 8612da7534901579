use core::cell::Cell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_polled_button::{
    adc::{
        filter::{MedianFilter, RawFilter},
        Adc, AdcFilter, AdcLevelSource,
    },
    config::DebounceConfig,
    ButtonPress, DebounceEngine, Error, EventBank, LevelSource,
};

// --- Mock Hardware (模拟硬件) ---

// 1. 模拟一个电压可以被测试动态改变的ADC
struct MockAdc {
    value: Rc<Cell<u16>>,
}
impl Adc for MockAdc {
    type Error = Infallible;
    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self.value.get())
    }
}

// 2. 按脚本逐次返回采样值的ADC
struct ScriptedAdc {
    samples: VecDeque<u16>,
}
impl Adc for ScriptedAdc {
    type Error = Infallible;
    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(self.samples.pop_front().unwrap_or(0))
    }
}

// 3. 读取永远失败的ADC
struct BrokenAdc;

#[derive(Debug)]
struct BrokenAdcError;
impl Adc for BrokenAdc {
    type Error = BrokenAdcError;
    fn read(&mut self) -> Result<u16, Self::Error> {
        Err(BrokenAdcError)
    }
}

const THRESHOLD_LOW: u16 = 900;
const THRESHOLD_HIGH: u16 = 1100;

#[test]
fn window_compare_decides_active_state() {
    let value = Rc::new(Cell::new(0));
    let mut source = AdcLevelSource::new(
        MockAdc {
            value: value.clone(),
        },
        RawFilter,
        THRESHOLD_LOW,
        THRESHOLD_HIGH,
    );

    assert!(!source.is_active());
    value.set(1000);
    assert!(source.is_active());
    // 窗口边界本身算按下，越界则不算
    value.set(THRESHOLD_HIGH);
    assert!(source.is_active());
    value.set(THRESHOLD_HIGH + 1);
    assert!(!source.is_active());
}

#[test]
fn median_filter_rejects_single_sample_spikes() {
    let mut filter = MedianFilter::<3>::new();

    assert_eq!(filter.process(0), None);
    assert_eq!(filter.process(4095), None); // 尖刺
    assert_eq!(filter.process(10), Some(10));
}

#[test]
fn median_filtered_source_ignores_spikes() {
    // 三个样本里只有一个落在窗口内，中位值仍在窗口外
    let adc = ScriptedAdc {
        samples: VecDeque::from([0, 1000, 0]),
    };
    let mut source = AdcLevelSource::new(adc, MedianFilter::<3>::new(), THRESHOLD_LOW, THRESHOLD_HIGH);
    assert!(!source.is_active());

    // 多数样本在窗口内时按下成立
    let adc = ScriptedAdc {
        samples: VecDeque::from([1000, 0, 1010]),
    };
    let mut source = AdcLevelSource::new(adc, MedianFilter::<3>::new(), THRESHOLD_LOW, THRESHOLD_HIGH);
    assert!(source.is_active());
}

#[test]
fn unreadable_adc_is_rejected_at_registration() {
    let events = EventBank::<1>::new();
    let mut engine = DebounceEngine::new(&events, DebounceConfig::default());

    assert_eq!(
        engine
            .register(
                AdcLevelSource::new(BrokenAdc, RawFilter, THRESHOLD_LOW, THRESHOLD_HIGH),
                false,
            )
            .unwrap_err(),
        Error::InvalidSource
    );
}

#[test]
fn adc_button_classifies_short_press() {
    let events = EventBank::<1>::new();
    let value = Rc::new(Cell::new(0));
    let mut engine = DebounceEngine::new(&events, DebounceConfig::default());
    let handle = engine
        .register(
            AdcLevelSource::new(
                MockAdc {
                    value: value.clone(),
                },
                RawFilter,
                THRESHOLD_LOW,
                THRESHOLD_HIGH,
            ),
            false,
        )
        .unwrap();

    // 电压进入窗口 15 个滴答后回落：一次短按
    value.set(1000);
    for _ in 0..15 {
        engine.tick();
    }
    value.set(0);
    for _ in 0..45 {
        engine.tick();
    }
    assert_eq!(events.check_status(handle).unwrap(), ButtonPress::Short);
}
