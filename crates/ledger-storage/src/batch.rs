/// A set of key/value writes applied atomically by [`crate::Store::apply_batch`].
///
/// Thin wrapper over `sled::Batch` so callers above this crate never need to
/// depend on `sled` directly.
#[derive(Default)]
pub struct Batch(pub(crate) sled::Batch);

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) {
        self.0.insert(key.as_ref(), value.as_ref());
    }

    pub fn remove(&mut self, key: impl AsRef<[u8]>) {
        self.0.remove(key.as_ref());
    }
}
