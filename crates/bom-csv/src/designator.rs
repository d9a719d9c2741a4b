use std::cmp::Ordering;

/// Sort key for a reference designator: its leading letters and the number after them.
///
/// "R10" → ("R", 10). Anything past the first number is ignored, so "R1A" and
/// "R1B" compare equal and keep their original order under a stable sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DesignatorKey<'a> {
    prefix: &'a str,
    number: u64,
}

impl<'a> DesignatorKey<'a> {
    pub fn new(designator: &'a str) -> Self {
        let digits_start = designator
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(designator.len());
        let (prefix, rest) = designator.split_at(digits_start);

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        // Empty or overflowing runs count as 0
        let number = rest[..digits_end].parse().unwrap_or(0);

        Self { prefix, number }
    }

    pub fn prefix(&self) -> &'a str {
        self.prefix
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

/// Compare two reference designators alphanumerically (R2 < R10)
pub fn compare(a: &str, b: &str) -> Ordering {
    DesignatorKey::new(a).cmp(&DesignatorKey::new(b))
}
