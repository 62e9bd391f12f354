//! Syntax validation for filter expressions.
//!
//! The gateway never evaluates filters against events; that is the backend's
//! job. Expressions are still shape-checked when a session starts streaming,
//! so a client with a typo learns about it through one in-band error instead
//! of a silently empty stream.

/// Check that `filter` looks like a predicate expression: an alphabetic
/// operator name, an argument list in parentheses, and balanced parentheses
/// throughout. `eq(attributes/color,"red")` and `and(gt(a,1),lt(a,5))` pass;
/// `eq(a`, `(a)` and blank strings do not.
pub fn validate(filter: &str) -> Result<(), String> {
    let trimmed = filter.trim();
    if trimmed.is_empty() {
        return Err("filter expression is empty".to_string());
    }

    let operator = match trimmed.find('(') {
        Some(position) => &trimmed[..position],
        None => return Err(format!("'{trimmed}' has no argument list")),
    };
    if operator.is_empty() || !operator.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(format!("'{trimmed}' does not start with an operator name"));
    }
    if !trimmed.ends_with(')') {
        return Err(format!("'{trimmed}' does not close its argument list"));
    }

    let mut depth: u32 = 0;
    for c in trimmed.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(next) => depth = next,
                None => return Err(format!("'{trimmed}' closes more groups than it opens")),
            },
            _ => {}
        }
    }
    if depth != 0 {
        return Err(format!("'{trimmed}' has unbalanced parentheses"));
    }

    Ok(())
}
