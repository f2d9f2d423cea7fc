//! Check formula templates
//!
//! Every check comes in two polarities: a *valid* formula (TRUE when the
//! value passes, used in data validation) and an *invalid* formula (TRUE when
//! it fails, used to highlight cells). Formulas are written relative to the
//! first data cell of the column and the platform applies them down the range.
//!
//! Blank cells pass every check except `required`, whose invalid form only
//! fires on rows that are partially filled in.

use tablecloth_core::{FieldType, Value};

/// Logical operator joining formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logical {
    And,
    Or,
}

impl Logical {
    fn as_str(&self) -> &'static str {
        match self {
            Logical::And => "AND",
            Logical::Or => "OR",
        }
    }
}

/// References a column's formulas are written against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContext {
    /// First data cell, relative (`B2`)
    pub cell: String,
    /// Data range of the column, fixed (`$B$2:$B$1001`)
    pub column_range: String,
    /// The table's columns on the first data row, row-relative (`$A2:$C2`)
    pub row_range: String,
    /// Number of columns in the table
    pub ncols: usize,
}

/// A check in both polarities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    /// Formula returning TRUE for valid values
    pub valid: String,
    /// Formula returning TRUE for invalid values
    pub invalid: String,
    /// Description of valid values ("≥ 1")
    pub message: String,
    /// Blank cells pass without evaluating the formula
    pub ignore_blank: bool,
}

impl Check {
    fn new(valid: String, invalid: String, message: impl Into<String>) -> Self {
        Self {
            valid,
            invalid,
            message: message.into(),
            ignore_blank: true,
        }
    }
}

/// Format a number for a formula (`1`, `0.5`, `-3`)
pub fn number(value: f64) -> String {
    Value::Number(value).to_formula()
}

/// Type test for numeric and boolean fields; text needs none
pub fn type_test(field_type: FieldType, ctx: &CellContext) -> Option<Check> {
    let x = &ctx.cell;
    match field_type {
        FieldType::String => None,
        FieldType::Number => Some(Check::new(
            format!("ISNUMBER({x})"),
            format!("NOT(ISNUMBER({x}))"),
            "number",
        )),
        FieldType::Integer => Some(Check::new(
            format!("IF(ISNUMBER({x}), INT({x}) = {x}, FALSE)"),
            format!("IF(ISNUMBER({x}), INT({x}) <> {x}, TRUE)"),
            "integer",
        )),
        FieldType::Boolean => Some(Check::new(
            format!("OR({x} = TRUE, {x} = FALSE)"),
            format!("AND({x} <> TRUE, {x} <> FALSE)"),
            "TRUE or FALSE",
        )),
    }
}

/// Value must not be blank
pub fn required(ctx: &CellContext) -> Check {
    let x = &ctx.cell;
    Check {
        valid: format!("NOT(ISBLANK({x}))"),
        invalid: format!(
            "AND(ISBLANK({x}), COUNTBLANK({}) <> {})",
            ctx.row_range, ctx.ncols
        ),
        message: "not blank".into(),
        ignore_blank: false,
    }
}

/// Value occurs at most once in the column
pub fn unique(ctx: &CellContext, case_sensitive: bool) -> Check {
    let (x, range) = (&ctx.cell, &ctx.column_range);
    if case_sensitive {
        Check::new(
            format!("SUMPRODUCT(--EXACT({range}, {x})) <= 1"),
            format!("SUMPRODUCT(--EXACT({range}, {x})) > 1"),
            "unique",
        )
    } else {
        Check::new(
            format!("COUNTIF({range}, {x}) < 2"),
            format!("COUNTIF({range}, {x}) >= 2"),
            "unique",
        )
    }
}

/// Value is at least `min`
pub fn minimum(ctx: &CellContext, min: f64) -> Check {
    let (x, v) = (&ctx.cell, number(min));
    Check::new(format!("{x} >= {v}"), format!("{x} < {v}"), format!("≥ {v}"))
}

/// Value is at most `max`
pub fn maximum(ctx: &CellContext, max: f64) -> Check {
    let (x, v) = (&ctx.cell, number(max));
    Check::new(format!("{x} <= {v}"), format!("{x} > {v}"), format!("≤ {v}"))
}

/// Text length is at least `min`
pub fn min_length(ctx: &CellContext, min: u32) -> Check {
    let x = &ctx.cell;
    Check::new(
        format!("LEN({x}) >= {min}"),
        format!("LEN({x}) < {min}"),
        format!("length ≥ {min}"),
    )
}

/// Text length is at most `max`
pub fn max_length(ctx: &CellContext, max: u32) -> Check {
    let x = &ctx.cell;
    Check::new(
        format!("LEN({x}) <= {max}"),
        format!("LEN({x}) > {max}"),
        format!("length ≤ {max}"),
    )
}

/// Whole value matches `regex`
pub fn pattern(ctx: &CellContext, regex: &str) -> Check {
    let x = &ctx.cell;
    let anchored = format!("\"^(?:{})$\"", regex.replace('"', "\"\""));
    Check::new(
        format!("REGEXMATCH(TO_TEXT({x}), {anchored})"),
        format!("NOT(REGEXMATCH(TO_TEXT({x}), {anchored}))"),
        format!("matching the regular expression {regex}"),
    )
}

/// Value is one of the values in `reference`
pub fn in_range(ctx: &CellContext, reference: &str, message: impl Into<String>) -> Check {
    let x = &ctx.cell;
    Check::new(
        format!("ISNUMBER(MATCH({x}, {reference}, 0))"),
        format!("ISNA(MATCH({x}, {reference}, 0))"),
        message,
    )
}

/// Value equals one of `values`
pub fn in_literals(ctx: &CellContext, values: &[Value]) -> Check {
    let x = &ctx.cell;
    let valid: Vec<String> = values
        .iter()
        .map(|v| format!("{x} = {}", v.to_formula()))
        .collect();
    let invalid: Vec<String> = values
        .iter()
        .map(|v| format!("{x} <> {}", v.to_formula()))
        .collect();
    Check::new(
        merge_formulas(&valid, Logical::Or),
        merge_formulas(&invalid, Logical::And),
        one_of(values),
    )
}

/// Message for a list of permissible values ("one of a, b, c")
pub fn one_of(values: &[Value]) -> String {
    let listed: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("one of {}", listed.join(", "))
}

/// Join formulas with a logical operator
///
/// ```
/// use tablecloth_compiler::formula::{merge_formulas, Logical};
///
/// assert_eq!(merge_formulas(&[], Logical::And), "");
/// assert_eq!(merge_formulas(&["A2 > 0".to_string()], Logical::And), "A2 > 0");
/// assert_eq!(
///     merge_formulas(&["A2 > 0".to_string(), "A2 < 3".to_string()], Logical::Or),
///     "OR(A2 > 0, A2 < 3)"
/// );
/// ```
pub fn merge_formulas(formulas: &[String], operator: Logical) -> String {
    match formulas {
        [] => String::new(),
        [single] => single.clone(),
        _ => format!("{}({})", operator.as_str(), formulas.join(", ")),
    }
}

/// Combine checks into one formula of the given polarity
///
/// Checks ignoring blanks are grouped under a single
/// `IF(ISBLANK(cell), ...)` guard. Returns `None` when there are no checks.
pub fn merge_conditions(checks: &[&Check], valid: bool, cell: &str) -> Option<String> {
    if checks.is_empty() {
        return None;
    }
    let operator = if valid { Logical::And } else { Logical::Or };
    let pick = |c: &Check| if valid { c.valid.clone() } else { c.invalid.clone() };

    let mut formulas: Vec<String> = checks
        .iter()
        .filter(|c| !c.ignore_blank)
        .map(|c| pick(*c))
        .collect();
    let guarded: Vec<String> = checks
        .iter()
        .filter(|c| c.ignore_blank)
        .map(|c| pick(*c))
        .collect();
    if !guarded.is_empty() {
        formulas.push(format!(
            "IF(ISBLANK({cell}), {}, {})",
            if valid { "TRUE" } else { "FALSE" },
            merge_formulas(&guarded, operator)
        ));
    }
    Some(merge_formulas(&formulas, operator))
}

/// English list with an Oxford comma
///
/// ```
/// use tablecloth_compiler::formula::readable_join;
///
/// assert_eq!(readable_join(&["a"]), "a");
/// assert_eq!(readable_join(&["a", "b"]), "a and b");
/// assert_eq!(readable_join(&["a", "b", "c"]), "a, b, and c");
/// ```
pub fn readable_join<S: AsRef<str>>(values: &[S]) -> String {
    let values: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    match values.as_slice() {
        [] => String::new(),
        [single] => single.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// Message describing the values that pass all `checks`
pub fn validation_message(checks: &[&Check]) -> String {
    let messages: Vec<&str> = checks.iter().map(|c| c.message.as_str()).collect();
    format!("Value must be {}", readable_join(&messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ctx() -> CellContext {
        CellContext {
            cell: "B2".into(),
            column_range: "$B$2:$B$1001".into(),
            row_range: "$A2:$C2".into(),
            ncols: 3,
        }
    }

    #[test]
    fn test_type_tests() {
        let ctx = ctx();
        assert!(type_test(FieldType::String, &ctx).is_none());
        assert_eq!(type_test(FieldType::Number, &ctx).unwrap().valid, "ISNUMBER(B2)");
        let integer = type_test(FieldType::Integer, &ctx).unwrap();
        assert_eq!(integer.valid, "IF(ISNUMBER(B2), INT(B2) = B2, FALSE)");
        assert_eq!(integer.invalid, "IF(ISNUMBER(B2), INT(B2) <> B2, TRUE)");
    }

    #[test]
    fn test_required_only_flags_partial_rows() {
        let check = required(&ctx());
        assert!(!check.ignore_blank);
        assert_eq!(check.valid, "NOT(ISBLANK(B2))");
        assert_eq!(check.invalid, "AND(ISBLANK(B2), COUNTBLANK($A2:$C2) <> 3)");
    }

    #[test]
    fn test_unique() {
        let ctx = ctx();
        assert_eq!(
            unique(&ctx, true).valid,
            "SUMPRODUCT(--EXACT($B$2:$B$1001, B2)) <= 1"
        );
        assert_eq!(unique(&ctx, false).invalid, "COUNTIF($B$2:$B$1001, B2) >= 2");
    }

    #[test]
    fn test_bounds() {
        let ctx = ctx();
        let min = minimum(&ctx, 1.0);
        assert_eq!(min.valid, "B2 >= 1");
        assert_eq!(min.invalid, "B2 < 1");
        assert_eq!(min.message, "≥ 1");
        assert_eq!(maximum(&ctx, 2.5).valid, "B2 <= 2.5");
        assert_eq!(min_length(&ctx, 3).valid, "LEN(B2) >= 3");
        assert_eq!(max_length(&ctx, 8).invalid, "LEN(B2) > 8");
    }

    #[test]
    fn test_pattern_is_anchored_and_escaped() {
        let check = pattern(&ctx(), "a|\"b\"");
        assert_eq!(check.valid, "REGEXMATCH(TO_TEXT(B2), \"^(?:a|\"\"b\"\")$\")");
        assert_eq!(check.message, "matching the regular expression a|\"b\"");
    }

    #[test]
    fn test_membership() {
        let ctx = ctx();
        let check = in_range(&ctx, "'main'!$A$2:$A$1001", "in main.id");
        assert_eq!(check.message, "in main.id");
        assert_eq!(check.valid, "ISNUMBER(MATCH(B2, 'main'!$A$2:$A$1001, 0))");
        assert_eq!(check.invalid, "ISNA(MATCH(B2, 'main'!$A$2:$A$1001, 0))");

        let check = in_literals(&ctx, &[Value::from("a"), Value::from("b")]);
        assert_eq!(check.valid, "OR(B2 = \"a\", B2 = \"b\")");
        assert_eq!(check.invalid, "AND(B2 <> \"a\", B2 <> \"b\")");
        assert_eq!(check.message, "one of a, b");
    }

    #[test]
    fn test_merge_conditions() {
        let ctx = ctx();
        let req = required(&ctx);
        let min = minimum(&ctx, 0.0);
        let max = maximum(&ctx, 3.0);

        assert_eq!(merge_conditions(&[], true, "B2"), None);
        assert_eq!(
            merge_conditions(&[&min, &max], true, "B2").unwrap(),
            "IF(ISBLANK(B2), TRUE, AND(B2 >= 0, B2 <= 3))"
        );
        assert_eq!(
            merge_conditions(&[&req, &max], false, "B2").unwrap(),
            "OR(AND(ISBLANK(B2), COUNTBLANK($A2:$C2) <> 3), IF(ISBLANK(B2), FALSE, B2 > 3))"
        );
        assert_eq!(
            merge_conditions(&[&req], true, "B2").unwrap(),
            "NOT(ISBLANK(B2))"
        );
    }

    #[test]
    fn test_validation_message() {
        let ctx = ctx();
        let checks = [required(&ctx), unique(&ctx, false), minimum(&ctx, 1.0)];
        let refs: Vec<&Check> = checks.iter().collect();
        assert_eq!(validation_message(&refs), "Value must be not blank, unique, and ≥ 1");
    }

    #[test]
    fn test_readable_join_empty() {
        let empty: [&str; 0] = [];
        assert_eq!(readable_join(&empty), "");
    }
}
