use bevy::prelude::*;

/// Load progress for the current generation, in completed units.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: u32,
    /// `None` until the loader knows how many units there are.
    pub total: Option<u32>,
}

impl LoadProgress {
    pub fn new(loaded: u32, total: Option<u32>) -> Self {
        Self { loaded, total }
    }

    pub fn set(&mut self, loaded: u32, total: Option<u32>) {
        self.loaded = loaded;
        self.total = total;
    }

    /// Move forward to `next`. Progress reported for one generation never goes
    /// backwards; returns whether anything changed.
    pub fn advance_to(&mut self, next: LoadProgress) -> bool {
        let loaded = self.loaded.max(next.loaded);
        let total = next.total.or(self.total);
        if loaded == self.loaded && total == self.total {
            return false;
        }
        self.set(loaded, total);
        true
    }

    pub fn fraction(&self) -> f32 {
        let total = self.total.unwrap_or(1).max(1);
        (self.loaded as f32 / total as f32).clamp(0.0, 1.0)
    }

    pub fn percent(&self) -> f32 {
        self.fraction() * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.total.is_some_and(|total| self.loaded >= total)
    }

    /// Overlay text, e.g. `"75%"`.
    pub fn label(&self) -> String {
        format!("{:.0}%", self.percent())
    }
}

/// Fired whenever [`LoadProgress`] moves.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LoadProgressChanged {
    pub generation: u64,
    pub percent: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_stays_in_range() {
        assert_eq!(LoadProgress::default().percent(), 0.0);
        assert_eq!(LoadProgress::new(1, Some(4)).percent(), 25.0);
        assert_eq!(LoadProgress::new(9, Some(4)).percent(), 100.0);
        // Unknown total counts against a single unit.
        assert_eq!(LoadProgress::new(1, None).percent(), 100.0);
        assert_eq!(LoadProgress::new(0, Some(0)).percent(), 0.0);
    }

    #[test]
    fn progress_only_moves_forward() {
        let mut progress = LoadProgress::new(0, Some(4));
        assert!(progress.advance_to(LoadProgress::new(2, Some(4))));
        assert!(!progress.advance_to(LoadProgress::new(1, Some(4))));
        assert_eq!(progress.loaded, 2);
        assert!(!progress.advance_to(LoadProgress::new(2, None)));
        assert!(progress.advance_to(LoadProgress::new(4, Some(4))));
        assert!(progress.is_complete());
        assert_eq!(progress.label(), "100%");
    }

    #[test]
    fn label_rounds_to_whole_percent() {
        assert_eq!(LoadProgress::new(1, Some(3)).label(), "33%");
        assert_eq!(LoadProgress::new(2, Some(3)).label(), "67%");
    }
}
