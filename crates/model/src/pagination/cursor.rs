use crate::pagination::page::CacheKey;

/// Caller-owned paging state: which page set is being read and how far.
///
/// Switching the active page set always rewinds the cursor to the first page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    active_key: CacheKey,
    cursor: usize,
}

impl Session {
    pub fn new(active_key: CacheKey) -> Self {
        Self {
            active_key,
            cursor: 0,
        }
    }

    pub fn active_key(&self) -> &CacheKey {
        &self.active_key
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn activate(&mut self, key: CacheKey) {
        self.active_key = key;
        self.cursor = 0;
    }

    pub fn advance_cursor(&mut self) -> usize {
        self.cursor += 1;
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CacheKey::base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_only_moves_forward_until_reset() {
        let mut session = Session::default();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.advance_cursor(), 1);
        assert_eq!(session.advance_cursor(), 2);

        session.reset_cursor();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn test_activate_rewinds() {
        let mut session = Session::default();
        session.advance_cursor();

        session.activate(CacheKey::filtered());
        assert_eq!(session.active_key(), &CacheKey::filtered());
        assert_eq!(session.cursor(), 0);
    }
}
