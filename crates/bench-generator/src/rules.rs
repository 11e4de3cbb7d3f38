//! Field rules for generated records.

/// Shape of a generated [`User`](bench_core::User).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRules {
    /// Minimum number of friend usernames (inclusive).
    pub min_friends: usize,
    /// Maximum number of friend usernames (inclusive).
    pub max_friends: usize,
    /// `Address::line2` is left empty once in this many generations.
    pub line2_null_one_in: u32,
    /// Word count range for the last message, `[min, max)`.
    pub message_words: (usize, usize),
}

impl Default for UserRules {
    fn default() -> Self {
        Self {
            min_friends: 2,
            max_friends: 6,
            line2_null_one_in: 6,
            message_words: (4, 10),
        }
    }
}
