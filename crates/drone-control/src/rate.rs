//! 固定频率循环辅助
//!
//! 以绝对截止时间推进，使用 `spin_sleep` 降低抖动。
//! 如果某次迭代超时（已错过截止时间），从当前时刻重新计时，不做追赶。

use std::time::{Duration, Instant};

use crate::error::ControlError;

/// 固定频率节拍器
#[derive(Debug)]
pub struct Rate {
    period: Duration,
    next: Instant,
}

impl Rate {
    pub fn new(frequency_hz: f64) -> Result<Self, ControlError> {
        if !(frequency_hz.is_finite() && frequency_hz > 0.0) {
            return Err(ControlError::InvalidConfig(format!(
                "Invalid frequency_hz: {} (must be > 0)",
                frequency_hz
            )));
        }
        if frequency_hz > 10000.0 {
            tracing::warn!(
                "Very high loop frequency: {} Hz. This may cause performance issues.",
                frequency_hz
            );
        }

        let period = Duration::try_from_secs_f64(1.0 / frequency_hz).map_err(|e| {
            ControlError::InvalidConfig(format!(
                "Invalid frequency_hz: {} (period out of range: {})",
                frequency_hz, e
            ))
        })?;
        Ok(Self {
            period,
            next: Instant::now() + period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 休眠到下一个周期
    pub fn sleep(&mut self) {
        let now = Instant::now();
        if self.next > now {
            spin_sleep::sleep(self.next - now);
            self.next += self.period;
        } else {
            tracing::trace!("rate: missed deadline by {:?}", now - self.next);
            self.next = now + self.period;
        }
    }
}
