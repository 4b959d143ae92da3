//! YAML 1.1 core-schema grammars for plain scalars.
//!
//! These functions only answer "does this text match the grammar, and what is it
//! worth". Deciding which grammar applies (and in which order) is the job of
//! [`crate::resolve`].

/// Null vocabulary: empty, `~`, `null`, `Null`, `NULL`.
pub fn is_yaml11_null(s: &str) -> bool {
    matches!(s, "" | "~" | "null" | "Null" | "NULL")
}

/// Parse a YAML 1.1 boolean (handles the "Norway problem").
///
/// Accepted TRUE literals: `y Y yes Yes YES true True TRUE on On ON`
/// Accepted FALSE literals: `n N no No NO false False FALSE off Off OFF`
///
/// Mixed-case spellings such as `yEs` are not booleans.
pub fn parse_yaml11_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "y" | "Y" | "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => {
            Some(true)
        }
        "n" | "N" | "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => {
            Some(false)
        }
        _ => None,
    }
}

/// Why an integer literal could not be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntError {
    /// The text does not match the integer grammar at all.
    Syntax,
    /// The text is an integer literal, but its magnitude does not fit in 128 bits.
    TooLarge,
}

fn parse_digits_u128(digits: &str, radix: u32, allow_empty: bool) -> Result<u128, IntError> {
    let mut val: u128 = 0;
    let mut saw = false;
    let mut too_large = false;
    for b in digits.as_bytes() {
        let d = match *b {
            b'_' => continue,
            b'0'..=b'9' => (b - b'0') as u32,
            b'a'..=b'f' if radix > 10 => 10 + (b - b'a') as u32,
            b'A'..=b'F' if radix > 10 => 10 + (b - b'A') as u32,
            _ => return Err(IntError::Syntax),
        };
        if d >= radix {
            return Err(IntError::Syntax);
        }
        saw = true;
        // Keep scanning after an overflow so that a syntax error later on still wins.
        match val
            .checked_mul(radix as u128)
            .and_then(|v| v.checked_add(d as u128))
        {
            Some(v) => val = v,
            None => too_large = true,
        }
    }
    if !saw && !allow_empty {
        Err(IntError::Syntax)
    } else if too_large {
        Err(IntError::TooLarge)
    } else {
        Ok(val)
    }
}

/// Parse a YAML 1.1 integer literal.
///
/// Grammar: optional `+`/`-`, then one of
/// - `0x`/`0X` followed by hex digits,
/// - `0b`/`0B` followed by binary digits,
/// - `0` followed by octal digits (`02472256`),
/// - `0`, or a decimal number not starting with `0`.
///
/// `_` may appear anywhere inside the digit run and is ignored. The magnitude is
/// parsed first and the sign applied afterwards.
pub fn parse_yaml11_int(s: &str) -> Result<i128, IntError> {
    let t = s.trim();
    let (neg, rest) = match t.strip_prefix('+') {
        Some(r) => (false, r),
        None => match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t),
        },
    };

    let mag = if let Some(r) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        parse_digits_u128(r, 16, false)?
    } else if let Some(r) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        parse_digits_u128(r, 2, false)?
    } else if let Some(r) = rest.strip_prefix('0') {
        // A lone `0` is decimal zero, anything after a leading zero is octal.
        parse_digits_u128(r, 8, true)?
    } else {
        match rest.as_bytes().first() {
            Some(b'1'..=b'9') => parse_digits_u128(rest, 10, false)?,
            _ => return Err(IntError::Syntax),
        }
    };

    if neg {
        if mag == i128::MAX as u128 + 1 {
            return Ok(i128::MIN);
        }
        let mag: i128 = mag.try_into().map_err(|_| IntError::TooLarge)?;
        Ok(-mag)
    } else {
        mag.try_into().map_err(|_| IntError::TooLarge)
    }
}

fn is_digit_run(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit() || b == b'_')
}

/// Parse a YAML 1.1 float literal.
///
/// Accepts `[-+]? digits? . digits? ([eE][-+]?digits)?` with `_` separators in the
/// mantissa, the exponent-only form `1e5`, `.inf`/`.Inf`/`.INF` (optionally signed)
/// and `.nan`/`.NaN`/`.NAN`. Integer-looking text without a dot or exponent is not
/// a float.
pub fn parse_yaml11_float(s: &str) -> Option<f64> {
    let t = s.trim();
    match t {
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let unsigned = t.strip_prefix(['+', '-']).unwrap_or(t);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
        None => (unsigned, None),
    };

    let (whole, frac) = match mantissa.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (mantissa, None),
    };
    if frac.is_none() && exponent.is_none() {
        return None;
    }
    if !is_digit_run(whole) || !frac.is_none_or(is_digit_run) {
        return None;
    }
    if whole.starts_with('_') {
        return None;
    }
    let digits = whole.bytes().chain(frac.unwrap_or("").bytes());
    if !digits.clone().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(exp) = exponent {
        let exp_digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let cleaned: String = t.chars().filter(|c| *c != '_').collect();
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_vocabulary_is_exact() {
        for t in ["y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON"] {
            assert_eq!(parse_yaml11_bool(t), Some(true), "{t}");
        }
        for f in ["n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF"] {
            assert_eq!(parse_yaml11_bool(f), Some(false), "{f}");
        }
        for bad in ["yEs", "tRUE", "1", "0", "truth", ""] {
            assert_eq!(parse_yaml11_bool(bad), None, "{bad}");
        }
    }

    #[test]
    fn null_vocabulary() {
        for n in ["", "~", "null", "Null", "NULL"] {
            assert!(is_yaml11_null(n));
        }
        assert!(!is_yaml11_null("nULL"));
        assert!(!is_yaml11_null("none"));
    }

    #[test]
    fn int_bases_from_the_yaml11_examples() {
        assert_eq!(parse_yaml11_int("685230"), Ok(685230));
        assert_eq!(parse_yaml11_int("+685_230"), Ok(685230));
        assert_eq!(parse_yaml11_int("02472256"), Ok(685230));
        assert_eq!(parse_yaml11_int("0x_0A_74_AE"), Ok(685230));
        assert_eq!(parse_yaml11_int("0b1010_0111_0100_1010_1110"), Ok(685230));
        assert_eq!(parse_yaml11_int("-0b101010"), Ok(-42));
        assert_eq!(parse_yaml11_int("0"), Ok(0));
        assert_eq!(parse_yaml11_int("-0"), Ok(0));
    }

    #[test]
    fn int_rejects_non_int_text() {
        for bad in ["", "+", "-", "0x", "0b2", "09", "1.0", "abc", "1_000a", "_1", "0x_"] {
            assert_eq!(parse_yaml11_int(bad), Err(IntError::Syntax), "{bad}");
        }
    }

    #[test]
    fn int_magnitude_beyond_128_bits_is_too_large() {
        let huge = "9".repeat(60);
        assert_eq!(parse_yaml11_int(&huge), Err(IntError::TooLarge));
        assert_eq!(
            parse_yaml11_int("-170141183460469231731687303715884105728"),
            Ok(i128::MIN)
        );
    }

    #[test]
    fn floats_from_the_yaml11_examples() {
        assert_eq!(parse_yaml11_float("6.8523e+5"), Some(6.8523e+5));
        assert_eq!(parse_yaml11_float("685.230_15e+03"), Some(685.23015e+03));
        assert_eq!(parse_yaml11_float("685_230.15"), Some(685230.15));
        assert_eq!(parse_yaml11_float(".1"), Some(0.1));
        assert_eq!(parse_yaml11_float("-.1"), Some(-0.1));
        assert_eq!(parse_yaml11_float("-.inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_yaml11_float(".Inf"), Some(f64::INFINITY));
        assert!(parse_yaml11_float(".NaN").is_some_and(f64::is_nan));
    }

    #[test]
    fn float_rejects_ints_and_words() {
        for bad in ["1", "-10", ".", "-.", "e5", "1e", "1.0e+", ".nAn", "-.nan", "inf", "1.2.3", "abc"] {
            assert_eq!(parse_yaml11_float(bad), None, "{bad}");
        }
    }
}
