//! Label sequence generation
//!
//! Labels run digit-minor, prefix-major: `A1..A9, B1..B9, ..., Z9, ZA1, ...`.
//! The letter `I` never appears since it reads like `1` or `l` on a badge.

/// Highest digit before the prefix advances
const MAX_DIGIT: u8 = 9;

/// Immutable position in the label sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelState {
    prefix: Vec<char>,
    digit: u8,
}

impl Default for LabelState {
    fn default() -> Self {
        Self::initial()
    }
}

impl LabelState {
    /// State that yields `A1`
    pub fn initial() -> Self {
        Self {
            prefix: vec!['A'],
            digit: 1,
        }
    }

    /// Label for this state
    pub fn label(&self) -> String {
        let mut label: String = self.prefix.iter().collect();
        label.push(char::from(b'0' + self.digit));
        label
    }

    /// The state following this one
    pub fn advance(&self) -> Self {
        if self.digit < MAX_DIGIT {
            return Self {
                prefix: self.prefix.clone(),
                digit: self.digit + 1,
            };
        }

        Self {
            prefix: next_prefix(&self.prefix),
            digit: 1,
        }
    }
}

fn next_prefix(prefix: &[char]) -> Vec<char> {
    let mut next = prefix.to_vec();
    match next.last().copied() {
        Some('Z') => next.push('A'),
        Some(last) => {
            let candidate = char::from(last as u8 + 1);
            let candidate = if candidate == 'I' { 'J' } else { candidate };
            if let Some(slot) = next.last_mut() {
                *slot = candidate;
            }
        }
        None => next.push('A'),
    }
    next
}

/// Unbounded label generator scoped to one annotation pass
#[derive(Debug, Clone, Default)]
pub struct LabelSequencer {
    state: LabelState,
}

impl LabelSequencer {
    /// Create a sequencer starting at `A1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current label and advance
    pub fn next_label(&mut self) -> String {
        let label = self.state.label();
        self.state = self.state.advance();
        label
    }
}

impl Iterator for LabelSequencer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_label())
    }
}
