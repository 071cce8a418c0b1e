/// Seconds-until-refresh counter shown next to the page title.
///
/// Cycles `max, max-1, ..., 0, max, ...` on every tick and jumps back to
/// `max` whenever a poll cycle starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    value: u32,
    max: u32,
}

impl Countdown {
    #[must_use]
    pub const fn new(max: u32) -> Self {
        Self { value: max, max }
    }

    pub fn tick(&mut self) {
        self.value = if self.value > 0 { self.value - 1 } else { self.max };
    }

    pub fn reset(&mut self) {
        self.value = self.max;
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.value
    }

    #[must_use]
    pub const fn max(self) -> u32 {
        self.max
    }
}
