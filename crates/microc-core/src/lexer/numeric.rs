//! Numeric-literal validity predicates, ported directly from the scanner
//! these are grounded on rather than re-derived from first principles.

pub fn is_valid_integer(num: &str) -> bool {
    if num.is_empty() {
        return false;
    }
    let digits = num.strip_prefix(['+', '-']).unwrap_or(num);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_decimal(num: &str) -> bool {
    if num.is_empty() {
        return false;
    }
    if num == "0" {
        return true;
    }
    if num.starts_with('0') {
        return false;
    }
    num.chars().all(|c| c.is_ascii_digit())
}

pub fn is_valid_hex(num: &str) -> bool {
    let lower = num.to_ascii_lowercase();
    if !lower.starts_with("0x") || num.len() <= 2 {
        return false;
    }
    num[2..].chars().all(|c| c.is_ascii_hexdigit())
}

pub fn is_valid_octal(num: &str) -> bool {
    if !num.starts_with('0') || num == "0" {
        return false;
    }
    num[1..].chars().all(|c| ('0'..='7').contains(&c))
}

pub fn is_valid_float(num: &str) -> bool {
    if num.is_empty() {
        return false;
    }
    let lower = num.to_ascii_lowercase();
    if let Some(idx) = lower.find('e') {
        if lower.matches('e').count() != 1 {
            return false;
        }
        let base = &num[..idx];
        let exp = &num[idx + 1..];
        if base.is_empty() || exp.is_empty() {
            return false;
        }
        return is_valid_float(base) && is_valid_integer(exp);
    }

    let Some(dot) = num.find('.') else {
        return false;
    };
    let (int_part, frac_part) = (&num[..dot], &num[dot + 1..]);
    if !int_part.is_empty() && !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    !frac_part.is_empty() && frac_part.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_rejects_leading_zero() {
        assert!(is_valid_decimal("0"));
        assert!(!is_valid_decimal("08"));
        assert!(is_valid_decimal("42"));
    }

    #[test]
    fn octal_requires_digits_0_to_7() {
        assert!(is_valid_octal("017"));
        assert!(!is_valid_octal("089"));
        assert!(!is_valid_octal("0"));
    }

    #[test]
    fn hex_requires_prefix_and_digits() {
        assert!(is_valid_hex("0x1F"));
        assert!(!is_valid_hex("0x"));
        assert!(!is_valid_hex("0xGG"));
    }

    #[test]
    fn float_supports_exponents_and_rejects_double_dots() {
        assert!(is_valid_float("3.14"));
        assert!(is_valid_float("1.23e10"));
        assert!(is_valid_float("4E-3"));
        assert!(!is_valid_float("1.2.3"));
        assert!(!is_valid_float("1e"));
    }
}
