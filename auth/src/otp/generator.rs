use rand::rngs::OsRng;
use rand::Rng;

/// Generates numeric one-time codes for email verification and password reset.
///
/// Codes come from the operating system CSPRNG and are always
/// [`OneTimeCodeGenerator::DIGITS`] characters long, zero-padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneTimeCodeGenerator;

impl OneTimeCodeGenerator {
    pub const DIGITS: usize = 6;

    const UPPER_BOUND: u32 = 1_000_000;

    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh code, e.g. `"042917"`.
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        let value = rng.gen_range(0..Self::UPPER_BOUND);
        format!("{:0width$}", value, width = Self::DIGITS)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_code_shape() {
        let generator = OneTimeCodeGenerator::new();

        for _ in 0..1000 {
            let code = generator.generate();
            assert_eq!(code.len(), OneTimeCodeGenerator::DIGITS);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_vary() {
        let generator = OneTimeCodeGenerator::new();

        let codes: HashSet<String> = (0..50).map(|_| generator.generate()).collect();
        assert!(codes.len() > 1);
    }
}
