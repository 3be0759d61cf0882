use anyhow::Result;
use opencv::core;

/// Strictly increasing tick source for crop file names.
///
/// Wraps OpenCV's high-resolution tick count; when two calls land on the same
/// raw value the previous tick is bumped by one so names never collide.
pub struct TickCounter {
    last: Option<i64>,
}

impl TickCounter {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn next_tick(&mut self) -> Result<i64> {
        let raw = core::get_tick_count()?;
        Ok(self.advance(raw))
    }

    fn advance(&mut self, raw: i64) -> i64 {
        let tick = match self.last {
            Some(last) if raw <= last => last + 1,
            _ => raw,
        };
        self.last = Some(tick);
        tick
    }
}
