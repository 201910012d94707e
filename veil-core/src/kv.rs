/// Injected key-value store.
///
/// Values are whole-object replacements; concurrent writers race and the last
/// write wins, which is sufficient for the resume-hint cache this backs.
/// Implementations use interior mutability behind `&self`.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn put(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
