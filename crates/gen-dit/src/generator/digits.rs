//! Digit templates such as phone numbers and postal codes.

use rand::Rng;

const PLACEHOLDER: &str = "%d";

/// A template whose `%d` placeholders are each replaced by one random digit.
///
/// # Example
///
/// ```
/// use gen_dit::DigitTemplate;
///
/// let template = DigitTemplate::new("%d%d-%d");
/// assert_eq!(template.placeholders(), 3);
/// assert_eq!(template.render(&[3, 1, 4]), "31-4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitTemplate {
    template: String,
    placeholders: usize,
}

impl DigitTemplate {
    /// Parses a template, counting its `%d` placeholders.
    pub fn new(template: impl Into<String>) -> Self {
        let resolved = template.into();
        let placeholders = resolved.matches(PLACEHOLDER).count();
        Self {
            template: resolved,
            placeholders,
        }
    }

    /// Returns the number of digit placeholders.
    #[must_use]
    pub const fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// Substitutes the given digits into the template, in order.
    ///
    /// Placeholders beyond the supplied digits render as `0`.
    #[must_use]
    pub fn render(&self, digits: &[u8]) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut supplied = digits.iter();
        let mut parts = self.template.split(PLACEHOLDER);
        if let Some(head) = parts.next() {
            rendered.push_str(head);
        }
        for part in parts {
            let digit = supplied.next().copied().unwrap_or_default();
            rendered.push(char::from(b'0' + digit.min(9)));
            rendered.push_str(part);
        }
        rendered
    }

    /// Fills every placeholder with an independent uniform digit.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let digits: Vec<u8> = (0..self.placeholders)
            .map(|_| rng.random_range(0..=9))
            .collect();
        self.render(&digits)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("%d%d-%d", &[3, 1, 4], "31-4")]
    #[case("%d%d%d %d%d%d %d%d%d%d", &[5, 5, 5, 0, 1, 2, 3, 4, 5, 6], "555 012 3456")]
    #[case("no digits", &[], "no digits")]
    #[case("%d", &[9], "9")]
    fn renders_digits_in_order(#[case] template: &str, #[case] digits: &[u8], #[case] expected: &str) {
        assert_eq!(DigitTemplate::new(template).render(digits), expected);
    }

    #[test]
    fn generate_fills_every_placeholder_with_a_digit() {
        let template = DigitTemplate::new("%d%d%d%d%d-%d%d%d%d");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let value = template.generate(&mut rng);
            assert_eq!(value.len(), 10);
            assert_eq!(value.chars().nth(5), Some('-'));
            assert!(value.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
        }
    }
}
