// Parsing, state-name and number-formatting helpers.
//
// Fact tables arrive as loosely typed text (database dumps, pandas exports),
// so the loader leans on these to turn cells into clean values.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, forgiving the formatting noise
/// common in exported tables.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // Years exported through a float column come back as `2022.0`.
    s.parse::<i32>()
        .ok()
        .or_else(|| i32::try_from(whole_number(parse_f64_safe(Some(s))?)? as i64).ok())
}

/// Parse a non-negative whole count. Accepts `1,234` and `1234.0`.
pub fn parse_count_safe(s: Option<&str>) -> Option<u64> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 {
        return None;
    }
    whole_number(v).map(|v| v as u64)
}

fn whole_number(v: f64) -> Option<f64> {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(v)
    } else {
        None
    }
}

/// Trimmed, non-empty text or `None`.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Title-case a state name the way the boundary reference spells it:
/// every letter that follows a non-letter is upper-cased, the rest lowered.
/// `"andaman-&-nicobar-islands"` becomes `"Andaman-&-Nicobar-Islands"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Key used to compare state names across tables that disagree on casing.
pub fn state_key(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn same_state(a: &str, b: &str) -> bool {
    state_key(a) == state_key(b)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

pub fn display_amount(v: &f64) -> String {
    format_number(*v, 2)
}

pub fn display_count(v: &u64) -> String {
    format_int(*v)
}
