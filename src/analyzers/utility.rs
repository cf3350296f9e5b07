/// Fraction `part / total` in `[0.0, 1.0]`. Returns 0.0 when `total` is zero.
pub fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_with_zero_total() {
        assert_eq!(share(10, 0), 0.0);
    }

    #[test]
    fn test_share_normal_values() {
        assert_eq!(share(1, 4), 0.25);
        assert_eq!(share(13, 13), 1.0);
    }
}
