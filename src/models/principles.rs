//! Canonical Leadership Principles, in the order they are displayed.

pub const LEADERSHIP_PRINCIPLES: [&str; 16] = [
    "Customer Obsession",
    "Ownership",
    "Invent and Simplify",
    "Are Right, A Lot",
    "Learn and Be Curious",
    "Hire and Develop the Best",
    "Insist on the Highest Standards",
    "Think Big",
    "Bias for Action",
    "Frugality",
    "Earn Trust",
    "Dive Deep",
    "Have Backbone; Disagree and Commit",
    "Deliver Results",
    "Strive to be Earth's Best Employer",
    "Success and Scale Bring Broad Responsibility",
];

/// Reserved pool for free-form questions not tied to a principle.
pub const COMMON_POOL: &str = "common";

/// Uppercase initials of the words in `name`, used as a question id prefix.
pub fn initials(name: &str) -> String {
    let prefix: String = name
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if prefix.is_empty() { "Q".to_string() } else { prefix }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials() {
        assert_eq!(initials("Customer Obsession"), "CO");
        assert_eq!(initials("Have Backbone; Disagree and Commit"), "HBDAC");
        assert_eq!(initials(COMMON_POOL), "C");
        assert_eq!(initials("  "), "Q");
    }
}
