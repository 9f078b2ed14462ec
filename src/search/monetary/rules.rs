//! String-level match rules for numeric queries.
//!
//! The rules get stricter as the query gets more specific: a long or decimal
//! query must line up with the stored amount almost exactly, a one-digit query
//! only has to share the leading digit.

/// Strip currency symbols, thousands separators and whitespace
pub fn normalize_numeric(input: &str) -> String {
    input
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect()
}

/// Canonical plain rendering of a stored amount: `15309`, `800.50`
pub fn plain_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Thousands-separated rendering of a stored amount: `15,309`, `1,204.75`
pub fn comma_amount(amount: f64) -> String {
    let plain = plain_amount(amount);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Exact rule: normalized query equals the plain rendering
pub fn exact_rule(query: &str, data: &str) -> bool {
    query == data
}

/// Decimal rule for queries containing a decimal point.
///
/// Matches when the significant digits agree (`800.00` ~ `800`), or when the
/// dot-less query is a strict prefix of the dot-less data (`800.5` ~ `800.55`,
/// `15.3` ~ `1530`).
pub fn decimal_rule(query: &str, data: &str) -> bool {
    if significant(query) == significant(data) {
        return true;
    }

    let query_digits: String = query.chars().filter(|c| *c != '.').collect();
    let data_digits: String = data.chars().filter(|c| *c != '.').collect();
    query_digits.len() < data_digits.len() && data_digits.starts_with(&query_digits)
}

/// Comma-pattern rule: a query typed with separators matches when the
/// separated rendering of the data starts with it (`15,3` ~ `15,309`)
pub fn comma_pattern_rule(query: &str, amount: f64) -> bool {
    let typed: String = query
        .chars()
        .filter(|c| *c != '$' && !c.is_whitespace())
        .collect();
    if !typed.contains(',') || typed.contains('.') {
        return false;
    }
    comma_amount(amount).starts_with(&typed)
}

/// Digit-count ladder for integer queries.
///
/// - 4+ digits: data starts with the query
/// - 3 digits: data starts with the query, or the data is shorter and the
///   query starts with it
/// - 2 digits: data equals the query, data starts with the query and the
///   next data digit is `0`, or the data is a single digit the query starts
///   with
/// - 1 digit: leading digits agree
pub fn digit_ladder_rule(query: &str, data_int: &str) -> bool {
    if query.is_empty() || data_int.is_empty() {
        return false;
    }

    match query.len() {
        1 => data_int.starts_with(query),
        2 => {
            data_int == query
                || (data_int.len() > 2
                    && data_int.starts_with(query)
                    && data_int.as_bytes()[2] == b'0')
                || (data_int.len() < 2 && query.starts_with(data_int))
        }
        3 => data_int.starts_with(query) || (data_int.len() < 3 && query.starts_with(data_int)),
        _ => data_int.starts_with(query),
    }
}

/// Decide whether a typed numeric query matches a stored amount
pub fn matches_monetary_string(query: &str, amount: f64) -> bool {
    let normalized = normalize_numeric(query);
    if normalized.is_empty() || !amount.is_finite() {
        return false;
    }

    let data = plain_amount(amount);
    if exact_rule(&normalized, &data) {
        return true;
    }

    if normalized.contains('.') {
        return decimal_rule(&normalized, &data);
    }

    if !normalized.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    if comma_pattern_rule(query, amount) {
        return true;
    }

    let data_int = data.split('.').next().unwrap_or("");
    digit_ladder_rule(&normalized, data_int)
}

fn significant(value: &str) -> &str {
    if value.contains('.') {
        value.trim_end_matches('0').trim_end_matches('.')
    } else {
        value
    }
}
