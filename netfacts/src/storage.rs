//! Storage volume capacity.

use serde::Serialize;

/// Capacity of a named storage volume such as `bootflash`.
///
/// Byte counts are `None` until discovery fills them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageInfo {
    /// Volume name without the trailing colon.
    pub name: String,

    /// Free bytes.
    pub total_free_b: Option<u64>,

    /// Capacity in bytes.
    pub total_size_b: Option<u64>,
}

impl StorageInfo {
    pub fn new(name: impl Into<String>, total_free_b: u64, total_size_b: u64) -> Self {
        Self {
            name: name.into(),
            total_free_b: Some(total_free_b),
            total_size_b: Some(total_size_b),
        }
    }

    /// Whether at least `required_bytes` are free.
    ///
    /// Unknown free space never has room.
    pub fn has_space(&self, required_bytes: u64) -> bool {
        self.total_free_b
            .is_some_and(|free| free >= required_bytes)
    }

    /// Bytes in use, when both counts are known and consistent.
    pub fn used_b(&self) -> Option<u64> {
        self.total_size_b?.checked_sub(self.total_free_b?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_space_boundary() {
        let storage = StorageInfo::new("bootflash", 1_000_000, 2_000_000);
        assert!(storage.has_space(0));
        assert!(storage.has_space(999_999));
        assert!(storage.has_space(1_000_000));
        assert!(!storage.has_space(1_000_001));
    }

    #[test]
    fn test_unknown_free_space() {
        let storage = StorageInfo {
            name: "bootflash".into(),
            ..Default::default()
        };
        assert!(!storage.has_space(0));
        assert_eq!(storage.used_b(), None);
    }

    #[test]
    fn test_used_bytes() {
        assert_eq!(StorageInfo::new("bootflash", 300, 1000).used_b(), Some(700));
        // Inconsistent counts are reported, not clamped.
        assert_eq!(StorageInfo::new("bootflash", 2000, 1000).used_b(), None);
    }
}
