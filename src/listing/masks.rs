//! Input masks for Brazilian identifiers. Values go to the backend as bare digits and
//! are formatted only for display.

use once_cell::sync::Lazy;
use regex::Regex;

static CPF_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}\.?[0-9]{3}\.?[0-9]{3}-?[0-9]{2}$").unwrap());

pub fn digits_only(s: &str) -> String { s.chars().filter(|c| c.is_ascii_digit()).collect() }

/// Whether `s` looks like a CPF, masked (`000.000.000-00`) or bare (11 digits).
pub fn is_cpf(s: &str) -> bool { CPF_PATTERN.is_match(s.trim()) }

pub fn format_cpf(s: &str) -> String {
    let d = digits_only(s);
    if d.len() != 11 {
        return s.to_string();
    }
    format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
}

pub fn format_telefone(s: &str) -> String {
    let d = digits_only(s);
    match d.len() {
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_pattern() {
        assert!(is_cpf("123.456.789-01"));
        assert!(is_cpf("12345678901"));
        assert!(is_cpf("123456789-01"));
        assert!(!is_cpf("1234567890"));
        assert!(!is_cpf("١٢٣٤٥٦٧٨٩٠١"));
        assert!(!is_cpf("123.456.789-0a"));
        assert!(!is_cpf("Maria"));
    }

    #[test]
    fn formatting() {
        assert_eq!(format_cpf("12345678901"), "123.456.789-01");
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_telefone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_telefone("(11) 3456-7890"), "(11) 3456-7890");
        assert_eq!(format_telefone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_telefone("999"), "999");
        assert_eq!(digits_only("(11) 9 8765-4321"), "11987654321");
    }
}
