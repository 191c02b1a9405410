//! Reveal cursor for the active flashcard.
use super::FlashcardItem;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayState {
    #[default]
    Question,
    Answer,
    KeyPoints,
}

/// Advances one state per reveal event and wraps back to `Question`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayCursor {
    state: DisplayState,
    with_key_points: bool,
}

impl DisplayCursor {
    pub fn new(with_key_points: bool) -> Self {
        Self {
            state: DisplayState::Question,
            with_key_points,
        }
    }

    pub fn for_item(item: &FlashcardItem) -> Self {
        Self::new(item.has_key_points())
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Moves to the next state. Returns `true` when the move wrapped around to `Question`,
    /// which marks a completed review cycle.
    pub fn advance(&mut self) -> bool {
        self.state = match (self.state, self.with_key_points) {
            (DisplayState::Question, _) => DisplayState::Answer,
            (DisplayState::Answer, true) => DisplayState::KeyPoints,
            (DisplayState::Answer, false) | (DisplayState::KeyPoints, _) => DisplayState::Question,
        };
        self.state == DisplayState::Question
    }

    pub fn is_terminal(&self) -> bool {
        match self.state {
            DisplayState::Question => false,
            DisplayState::Answer => !self.with_key_points,
            DisplayState::KeyPoints => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_state_cycle() {
        let mut cursor = DisplayCursor::new(true);
        assert_eq!(cursor.state(), DisplayState::Question);

        assert!(!cursor.advance());
        assert_eq!(cursor.state(), DisplayState::Answer);
        assert!(!cursor.advance());
        assert_eq!(cursor.state(), DisplayState::KeyPoints);
        assert!(cursor.is_terminal());
        assert!(cursor.advance());
        assert_eq!(cursor.state(), DisplayState::Question);
    }

    #[test]
    fn test_two_state_cycle_skips_key_points() {
        let item = FlashcardItem::new("common", "C1", "Why do you want this job?");
        let mut cursor = DisplayCursor::for_item(&item);

        assert!(!cursor.advance());
        assert_eq!(cursor.state(), DisplayState::Answer);
        assert!(cursor.is_terminal());
        assert!(cursor.advance());
        assert_eq!(cursor.state(), DisplayState::Question);
    }

    #[test]
    fn test_wraps_exactly_once_per_cycle() {
        let mut cursor = DisplayCursor::new(true);
        let wraps = (0..9).filter(|_| cursor.advance()).count();
        assert_eq!(wraps, 3);
    }
}
