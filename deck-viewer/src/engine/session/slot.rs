/// Holds at most one live value.
///
/// Attaching disposes whatever was live before the new value is stored, so
/// two values are never live together.
#[derive(Debug)]
pub struct AssetSlot<T> {
    live: Option<T>,
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        Self { live: None }
    }
}

impl<T> AssetSlot<T> {
    pub fn attach(&mut self, next: T, dispose: impl FnOnce(T)) {
        if let Some(previous) = self.live.take() {
            dispose(previous);
        }
        self.live = Some(next);
    }

    /// Dispose the live value, if any. Returns whether something was live.
    pub fn dispose(&mut self, dispose: impl FnOnce(T)) -> bool {
        match self.live.take() {
            Some(previous) => {
                dispose(previous);
                true
            }
            None => false,
        }
    }

    pub fn live(&self) -> Option<&T> {
        self.live.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}
