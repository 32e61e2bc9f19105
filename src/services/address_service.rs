//! Candidate address guessing.
//!
//! Turns a contact's display name into the addresses a message is tried
//! against, in delivery order.

/// Guesses mail addresses for names at one fixed domain.
#[derive(Debug, Clone)]
pub struct AddressGuesser {
    domain: String,
}

impl AddressGuesser {
    /// Creates a guesser for `domain` (e.g. "stripe.com").
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Returns the candidate addresses for `name`, highest priority first.
    ///
    /// The name is lowercased and split on whitespace. The first token is the
    /// first name and the last token the last name. A single-token name has an
    /// empty last name, which yields degenerate candidates such as
    /// `madonna.@domain`. A blank name yields no candidates.
    ///
    /// Order: `first@`, `{first initial}{last}@`, `first.last@`.
    pub fn guess(&self, name: &str) -> Vec<String> {
        let lowered = name.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        let Some(first) = tokens.first() else {
            return Vec::new();
        };
        let last = if tokens.len() > 1 {
            tokens[tokens.len() - 1]
        } else {
            ""
        };
        let initial: String = first.chars().take(1).collect();

        vec![
            format!("{}@{}", first, self.domain),
            format!("{}{}@{}", initial, last, self.domain),
            format!("{}.{}@{}", first, last, self.domain),
        ]
    }
}
