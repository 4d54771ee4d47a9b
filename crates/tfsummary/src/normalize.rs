//! static reduction of expressions to [Value]s
//!
//! No expression is ever evaluated. Literals and quoted strings are converted to their value, everything else
//! (arrays, objects, references, function calls, conditionals, operators, splats, `for` expressions, interpolated
//! templates, ...) is kept as the trimmed source text it was parsed from.
//!
//! All functions take the source the expression was parsed from. Spans recorded by [hcl_edit::parser] point into it.
use crate::value::Value;
use hcl_edit::expr::{Expression, ObjectKey};
use hcl_edit::template::{Element, Template};
use hcl_edit::{Number, Span};
use indexmap::IndexMap;

/// Reduce an expression to a [Value]
pub fn normalize(source: &str, expr: &Expression) -> Value {
    match expr {
        Expression::Null(_) => Value::Null,
        Expression::Bool(bool) => Value::Bool(*bool.value()),
        Expression::Number(num) => number(source, expr, num.value()),
        Expression::String(s) => Value::String(s.value().clone()),
        Expression::StringTemplate(template) => {
            literal_template(template).map_or_else(|| raw(source, expr), Value::String)
        }
        Expression::HeredocTemplate(heredoc) => {
            literal_template(&heredoc.template).map_or_else(|| raw(source, expr), Value::String)
        }
        // arrays, objects, variables, traversals (including index, attribute and splat access), function calls,
        // conditionals, operations, for expressions and parenthesis
        _ => raw(source, expr),
    }
}

/// Reduce an expression to a string
///
/// Strings and raw source text are returned as-is, other values are rendered via [Value]'s `Display` impl.
pub fn as_string(source: &str, expr: &Expression) -> String {
    match normalize(source, expr) {
        Value::String(value) | Value::Raw(value) => value,
        other => other.to_string(),
    }
}

/// Reduce an expression to a boolean
///
/// Never fails: strings (and raw text) that are not `true` or `false` (case-insensitive) are `false`, as is every
/// other non-boolean value.
pub fn as_bool(source: &str, expr: &Expression) -> bool {
    match normalize(source, expr) {
        Value::Bool(value) => value,
        Value::String(value) | Value::Raw(value) => value.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Reduce an expression to a list of strings
///
/// Array expressions are converted element by element. For anything else the source text is stripped of its
/// brackets and split on `,`. The split does not know about nesting or escaped quotes.
pub fn as_string_list(source: &str, expr: &Expression) -> Vec<String> {
    if let Expression::Array(array) = expr {
        return array
            .iter()
            .map(|element| as_string(source, element))
            .collect();
    }

    let raw = source_text(source, expr);
    let raw = raw.trim().trim_matches(|c| c == '[' || c == ']');

    raw.split(',')
        .map(|part| part.trim().trim_matches('"'))
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Reduce an object expression to a map of strings
///
/// Entries whose key is not a plain name or a quoted string are skipped. Anything that is not an object expression
/// results in an empty map.
pub fn as_string_map(source: &str, expr: &Expression) -> IndexMap<String, String> {
    let Expression::Object(object) = expr else {
        return IndexMap::new();
    };

    object
        .iter()
        .filter_map(|(key, value)| {
            let key = object_key(key).filter(|key| !key.is_empty())?;
            Some((key, as_string(source, value.expr())))
        })
        .collect()
}

/// Extract the static name of an object key
///
/// `name = ...`, `"name" = ...` and `name.attr = ...` (root name) are supported.
pub fn object_key(key: &ObjectKey) -> Option<String> {
    match key {
        ObjectKey::Ident(ident) => Some(ident.value().as_str().to_owned()),
        ObjectKey::Expression(expr) => match expr {
            Expression::String(s) => Some(s.value().clone()),
            Expression::Variable(var) => Some(var.value().as_str().to_owned()),
            Expression::Traversal(traversal) => match &traversal.expr {
                Expression::Variable(var) => Some(var.value().as_str().to_owned()),
                _ => None,
            },
            Expression::StringTemplate(template) => literal_template(template),
            _ => None,
        },
    }
}

/// Trimmed source text of an expression
///
/// Falls back to the encoded expression when it carries no span, e.g. when it was not produced by the parser.
pub fn source_text(source: &str, expr: &Expression) -> String {
    match expr.span().and_then(|span| source.get(span)) {
        Some(text) => text.trim().to_owned(),
        None => {
            tracing::trace!("expression has no span, encoding it instead");
            expr.to_string().trim().to_owned()
        }
    }
}

fn raw(source: &str, expr: &Expression) -> Value {
    Value::Raw(source_text(source, expr))
}

/// The content of a template made of exactly one literal (or nothing at all)
fn literal_template(template: &Template) -> Option<String> {
    let mut elements = template.iter();
    match (elements.next(), elements.next()) {
        (Some(Element::Literal(literal)), None) => Some(literal.value().clone()),
        (None, _) => Some(String::new()),
        _ => None,
    }
}

/// Integer when the literal as written has no fractional part, float otherwise
fn number(source: &str, expr: &Expression, num: &Number) -> Value {
    let literal = expr.span().and_then(|span| source.get(span));
    match literal.and_then(|literal| decimal(literal.trim())) {
        Some(Decimal::Integer(int)) => Value::Integer(int),
        Some(Decimal::Fractional) => num.as_f64().map_or_else(|| raw(source, expr), Value::Float),
        None => {
            tracing::trace!("number literal not available, using parsed value");
            match (num.as_i64(), num.as_f64()) {
                (Some(int), _) => Value::Integer(int),
                (None, Some(float)) => Value::Float(float),
                (None, None) => raw(source, expr),
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Decimal {
    /// Saturated to the i64 range
    Integer(i64),
    Fractional,
}

/// Classify a decimal literal (`12`, `1.50`, `1.5e3`, ...) without going through a float
fn decimal(literal: &str) -> Option<Decimal> {
    let (mantissa, exponent) = match literal.find(['e', 'E']) {
        Some(index) => (&literal[..index], literal[index + 1..].parse::<i64>().ok()?),
        None => (literal, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() || !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let digits = format!("{whole}{fraction}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Some(Decimal::Integer(0));
    }

    // value = significant * 10^exponent
    let significant = digits.trim_end_matches('0');
    let exponent = exponent
        .checked_sub(fraction.len() as i64)?
        .checked_add((digits.len() - significant.len()) as i64)?;
    if exponent < 0 {
        return Some(Decimal::Fractional);
    }

    let integer = significant
        .bytes()
        .try_fold(0_i64, |acc, digit| {
            acc.checked_mul(10)?.checked_add(i64::from(digit - b'0'))
        })
        .and_then(|significant| (0..exponent).try_fold(significant, |acc, _| acc.checked_mul(10)));

    Some(Decimal::Integer(integer.unwrap_or(i64::MAX)))
}
