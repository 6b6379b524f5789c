//! Predicate tree over named bins

use std::fmt;

use serde::{Deserialize, Serialize};

use super::expression::{CmpOp, Exp};
use super::filter::Filter;
use crate::model::PRIMARY_KEY_FIELD;
use crate::value::Value;

/// One end of a range predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeLimit {
    pub value: Value,
    #[serde(default = "inclusive_default")]
    pub inclusive: bool,
}

fn inclusive_default() -> bool {
    true
}

impl RangeLimit {
    pub fn inclusive(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            inclusive: true,
        }
    }

    pub fn exclusive(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            inclusive: false,
        }
    }
}

/// A filter condition over one or more bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// field = value
    Equals { field: String, value: Value },
    /// field != value
    NotEquals { field: String, value: Value },
    /// lower <op> field <op> upper, either end optional
    Range {
        field: String,
        #[serde(default)]
        lower: Option<RangeLimit>,
        #[serde(default)]
        upper: Option<RangeLimit>,
    },
    /// field IS NULL
    IsNull { field: String },
    /// field IS NOT NULL
    IsNotNull { field: String },
    /// field [NOT] IN (values)
    In {
        field: String,
        values: Vec<Value>,
        #[serde(default)]
        negated: bool,
    },
    And { predicates: Vec<Predicate> },
    Or { predicates: Vec<Predicate> },
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::NotEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::range(field, Some(RangeLimit::exclusive(value)), None)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::range(field, Some(RangeLimit::inclusive(value)), None)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::range(field, None, Some(RangeLimit::exclusive(value)))
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::range(field, None, Some(RangeLimit::inclusive(value)))
    }

    /// BETWEEN lower AND upper (both inclusive)
    pub fn between(
        field: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        Self::range(
            field,
            Some(RangeLimit::inclusive(lower)),
            Some(RangeLimit::inclusive(upper)),
        )
    }

    pub fn range(
        field: impl Into<String>,
        lower: Option<RangeLimit>,
        upper: Option<RangeLimit>,
    ) -> Self {
        Predicate::Range {
            field: field.into(),
            lower,
            upper,
        }
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        Predicate::IsNull {
            field: field.into(),
        }
    }

    pub fn is_not_null(field: impl Into<String>) -> Self {
        Predicate::IsNotNull {
            field: field.into(),
        }
    }

    pub fn in_list<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    pub fn not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Predicate::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn and(predicates: Vec<Predicate>) -> Self {
        Predicate::And { predicates }
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Predicate::Or { predicates }
    }

    /// Translates into the store's boolean expression algebra. Total.
    pub fn to_filter_expression(&self) -> Exp {
        match self {
            Predicate::Equals { field, value } => {
                Exp::cmp(CmpOp::Eq, operand(field), Exp::Val(value.clone()))
            }
            Predicate::NotEquals { field, value } => {
                Exp::cmp(CmpOp::Ne, operand(field), Exp::Val(value.clone()))
            }
            Predicate::Range {
                field,
                lower,
                upper,
            } => {
                let mut bounds = Vec::with_capacity(2);
                if let Some(limit) = lower {
                    let op = if limit.inclusive { CmpOp::Ge } else { CmpOp::Gt };
                    bounds.push(Exp::cmp(op, operand(field), Exp::Val(limit.value.clone())));
                }
                if let Some(limit) = upper {
                    let op = if limit.inclusive { CmpOp::Le } else { CmpOp::Lt };
                    bounds.push(Exp::cmp(op, operand(field), Exp::Val(limit.value.clone())));
                }
                match bounds.len() {
                    0 => exists(field),
                    1 => bounds.remove(0),
                    _ => Exp::And(bounds),
                }
            }
            Predicate::IsNull { field } => Exp::not(exists(field)),
            Predicate::IsNotNull { field } => exists(field),
            Predicate::In {
                field,
                values,
                negated,
            } => {
                let membership = Exp::In(Box::new(operand(field)), values.clone());
                if *negated {
                    // a missing operand is unknown, never a non-member
                    Exp::And(vec![exists(field), Exp::not(membership)])
                } else {
                    membership
                }
            }
            Predicate::And { predicates } => {
                Exp::And(predicates.iter().map(Predicate::to_filter_expression).collect())
            }
            Predicate::Or { predicates } => {
                Exp::Or(predicates.iter().map(Predicate::to_filter_expression).collect())
            }
        }
    }

    /// Index filter on `bin`, or `None` when an index cannot answer it.
    pub fn to_filter(&self, bin: &str) -> Option<Filter> {
        if bin == PRIMARY_KEY_FIELD {
            return None;
        }
        match self {
            Predicate::Equals { field, value } if field == bin => match value {
                Value::Int(_) | Value::String(_) => Some(Filter::equal(bin, value.clone())),
                _ => None,
            },
            Predicate::Range {
                field,
                lower,
                upper,
            } if field == bin => {
                if lower.is_none() && upper.is_none() {
                    return None;
                }
                let begin = match lower {
                    None => i64::MIN,
                    Some(RangeLimit { value: Value::Int(v), inclusive: true }) => *v,
                    Some(RangeLimit { value: Value::Int(v), inclusive: false }) => v.checked_add(1)?,
                    Some(_) => return None,
                };
                let end = match upper {
                    None => i64::MAX,
                    Some(RangeLimit { value: Value::Int(v), inclusive: true }) => *v,
                    Some(RangeLimit { value: Value::Int(v), inclusive: false }) => v.checked_sub(1)?,
                    Some(_) => return None,
                };
                (begin <= end).then(|| Filter::range(bin, begin, end))
            }
            Predicate::In {
                field,
                values,
                negated: false,
            } if field == bin => membership_filter(bin, values),
            Predicate::And { predicates } => {
                let mut narrowed: Option<Filter> = None;
                for filter in predicates.iter().filter_map(|p| p.to_filter(bin)) {
                    narrowed = Some(match narrowed {
                        None => filter,
                        Some(current) => current.intersect(&filter)?,
                    });
                }
                narrowed
            }
            _ => None,
        }
    }

    /// True if some referenced bin can be answered by an index filter
    pub fn is_indexable(&self) -> bool {
        self.bin_names()
            .iter()
            .any(|bin| self.to_filter(bin).is_some())
    }

    /// Referenced bins in first-seen order.
    ///
    /// Null checks contribute nothing; the primary key pseudo-field is
    /// never reported.
    pub fn bin_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_bin_names(&mut names);
        names
    }

    fn collect_bin_names(&self, names: &mut Vec<String>) {
        match self {
            Predicate::Equals { field, .. }
            | Predicate::NotEquals { field, .. }
            | Predicate::Range { field, .. }
            | Predicate::In { field, .. } => {
                if field != PRIMARY_KEY_FIELD && !names.contains(field) {
                    names.push(field.clone());
                }
            }
            Predicate::IsNull { .. } | Predicate::IsNotNull { .. } => {}
            Predicate::And { predicates } | Predicate::Or { predicates } => {
                for p in predicates {
                    p.collect_bin_names(names);
                }
            }
        }
    }
}

fn operand(field: &str) -> Exp {
    if field == PRIMARY_KEY_FIELD {
        Exp::Key
    } else {
        Exp::Bin(field.to_string())
    }
}

fn exists(field: &str) -> Exp {
    if field == PRIMARY_KEY_FIELD {
        Exp::KeyExists
    } else {
        Exp::BinExists(field.to_string())
    }
}

/// Integer lists narrow to [min, max]; a single string to equality.
/// The residual expression restores exact membership.
fn membership_filter(bin: &str, values: &[Value]) -> Option<Filter> {
    if values.is_empty() {
        return None;
    }
    let ints: Option<Vec<i64>> = values.iter().map(Value::as_int).collect();
    if let Some(ints) = ints {
        let min = ints.iter().copied().min()?;
        let max = ints.iter().copied().max()?;
        return Some(Filter::range(bin, min, max));
    }
    match values {
        [Value::String(s)] => Some(Filter::equal(bin, s.as_str())),
        _ => None,
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { field, value } => write!(f, "{} = {}", field, value),
            Predicate::NotEquals { field, value } => write!(f, "{} <> {}", field, value),
            Predicate::Range {
                field,
                lower,
                upper,
            } => {
                let mut parts = Vec::new();
                if let Some(l) = lower {
                    parts.push(format!("{} {} {}", field, if l.inclusive { ">=" } else { ">" }, l.value));
                }
                if let Some(u) = upper {
                    parts.push(format!("{} {} {}", field, if u.inclusive { "<=" } else { "<" }, u.value));
                }
                if parts.is_empty() {
                    write!(f, "{} IS NOT NULL", field)
                } else {
                    write!(f, "{}", parts.join(" AND "))
                }
            }
            Predicate::IsNull { field } => write!(f, "{} IS NULL", field),
            Predicate::IsNotNull { field } => write!(f, "{} IS NOT NULL", field),
            Predicate::In {
                field,
                values,
                negated,
            } => {
                let list: Vec<String> = values.iter().map(ToString::to_string).collect();
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{} {}IN ({})", field, not, list.join(", "))
            }
            Predicate::And { predicates } => write_connective(f, predicates, "AND"),
            Predicate::Or { predicates } => write_connective(f, predicates, "OR"),
        }
    }
}

fn write_connective(f: &mut fmt::Formatter<'_>, predicates: &[Predicate], word: &str) -> fmt::Result {
    let parts: Vec<String> = predicates.iter().map(|p| format!("({})", p)).collect();
    write!(f, "{}", parts.join(&format!(" {} ", word)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Key, Record};
    use std::collections::BTreeMap;

    fn rec(bins: &[(&str, Value)]) -> Record {
        let bins: BTreeMap<String, Value> = bins
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Record::new(None, bins, 1)
    }

    #[test]
    fn test_gt_translates_to_open_range() {
        let p = Predicate::gt("age", 30);
        assert!(p.is_indexable());
        assert_eq!(p.to_filter("age"), Some(Filter::range("age", 31, i64::MAX)));
        assert_eq!(p.to_filter("name"), None);
    }

    #[test]
    fn test_lt_and_between() {
        assert_eq!(
            Predicate::lt("age", 18).to_filter("age"),
            Some(Filter::range("age", i64::MIN, 17))
        );
        assert_eq!(
            Predicate::between("age", 18, 65).to_filter("age"),
            Some(Filter::range("age", 18, 65))
        );
    }

    #[test]
    fn test_overflowing_exclusive_bound_not_indexable() {
        let p = Predicate::gt("age", i64::MAX);
        assert_eq!(p.to_filter("age"), None);
        assert!(!p.is_indexable());
    }

    #[test]
    fn test_float_range_not_indexable() {
        let p = Predicate::gt("score", 1.5);
        assert!(!p.is_indexable());
        assert!(p.to_filter_expression().matches(&rec(&[("score", Value::Float(2.0))])));
    }

    #[test]
    fn test_equality_filters() {
        assert_eq!(
            Predicate::eq("name", "Alice").to_filter("name"),
            Some(Filter::equal("name", "Alice"))
        );
        assert!(!Predicate::eq("active", true).is_indexable());
        assert!(!Predicate::ne("name", "Alice").is_indexable());
    }

    #[test]
    fn test_membership_filters() {
        assert_eq!(
            Predicate::in_list("age", [40, 20, 30]).to_filter("age"),
            Some(Filter::range("age", 20, 40))
        );
        assert_eq!(
            Predicate::in_list("name", ["Alice"]).to_filter("name"),
            Some(Filter::equal("name", "Alice"))
        );
        assert!(!Predicate::in_list("name", ["Alice", "Bob"]).is_indexable());
        assert!(!Predicate::not_in("age", [1, 2]).is_indexable());
        assert!(!Predicate::in_list("age", Vec::<i64>::new()).is_indexable());
    }

    #[test]
    fn test_membership_expression_is_exact() {
        let p = Predicate::in_list("age", [20, 40]);
        let exp = p.to_filter_expression();
        assert!(exp.matches(&rec(&[("age", Value::Int(20))])));
        // inside the index range but not a member
        assert!(!exp.matches(&rec(&[("age", Value::Int(30))])));
    }

    #[test]
    fn test_not_in_skips_missing_bin() {
        let missing = rec(&[("name", Value::from("Ann"))]);
        let not_in = Predicate::not_in("age", [5]).to_filter_expression();
        let not_equal = Predicate::ne("age", 5).to_filter_expression();

        assert!(!not_in.matches(&missing));
        assert_eq!(not_in.matches(&missing), not_equal.matches(&missing));
        assert!(not_in.matches(&rec(&[("age", Value::Int(6))])));
        assert!(!not_in.matches(&rec(&[("age", Value::Int(5))])));
    }

    #[test]
    fn test_is_null_never_indexable() {
        let p = Predicate::is_null("name");
        assert!(!p.is_indexable());
        assert_eq!(p.to_filter("name"), None);
        assert!(p.bin_names().is_empty());
    }

    #[test]
    fn test_is_null_on_bin() {
        let p = Predicate::is_null("email");
        assert_eq!(
            p.to_filter_expression(),
            Exp::not(Exp::BinExists("email".into()))
        );
    }

    #[test]
    fn test_is_null_on_primary_key() {
        let p = Predicate::is_null(PRIMARY_KEY_FIELD);
        assert_eq!(p.to_filter_expression(), Exp::not(Exp::KeyExists));

        let keyed = Record::new(
            Some(Key::new("test", "users", Value::Int(1)).unwrap()),
            BTreeMap::new(),
            1,
        );
        assert!(!p.to_filter_expression().matches(&keyed));
        assert!(p.to_filter_expression().matches(&rec(&[])));
    }

    #[test]
    fn test_primary_key_never_indexable() {
        let p = Predicate::eq(PRIMARY_KEY_FIELD, 10);
        assert!(!p.is_indexable());
        assert!(p.bin_names().is_empty());
        assert_eq!(p.to_filter_expression(), Exp::cmp(CmpOp::Eq, Exp::Key, Exp::val(10)));
    }

    #[test]
    fn test_and_over_two_fields() {
        let p = Predicate::and(vec![Predicate::gt("age", 30), Predicate::eq("name", "Bob")]);
        assert!(p.is_indexable());
        assert_eq!(p.bin_names(), vec!["age", "name"]);
        assert_eq!(p.to_filter("age"), Some(Filter::range("age", 31, i64::MAX)));
        assert_eq!(p.to_filter("name"), Some(Filter::equal("name", "Bob")));
        assert_eq!(p.to_filter("score"), None);
    }

    #[test]
    fn test_and_intersects_same_field() {
        let p = Predicate::and(vec![Predicate::gte("age", 18), Predicate::lt("age", 65)]);
        assert_eq!(p.to_filter("age"), Some(Filter::range("age", 18, 64)));
    }

    #[test]
    fn test_unsatisfiable_and_not_indexable() {
        let p = Predicate::and(vec![Predicate::gt("age", 50), Predicate::lt("age", 10)]);
        assert_eq!(p.to_filter("age"), None);
        assert!(!p.is_indexable());
    }

    #[test]
    fn test_or_never_indexable() {
        let p = Predicate::or(vec![Predicate::eq("age", 1), Predicate::eq("age", 2)]);
        assert!(!p.is_indexable());
        assert_eq!(p.bin_names(), vec!["age"]);
    }

    #[test]
    fn test_indexable_iff_some_filter() {
        let predicates = vec![
            Predicate::eq("a", 1),
            Predicate::eq("a", 1.5),
            Predicate::gt("a", 1),
            Predicate::is_null("a"),
            Predicate::is_not_null("a"),
            Predicate::in_list("a", [1, 2]),
            Predicate::not_in("a", [1, 2]),
            Predicate::and(vec![Predicate::ne("a", 1), Predicate::gt("b", 1)]),
            Predicate::and(vec![Predicate::ne("a", 1), Predicate::is_null("b")]),
            Predicate::or(vec![Predicate::gt("a", 1)]),
        ];
        for p in predicates {
            let any_filter = p.bin_names().iter().any(|b| p.to_filter(b).is_some());
            assert_eq!(p.is_indexable(), any_filter, "{}", p);
            if !p.is_indexable() {
                for bin in ["a", "b", "c"] {
                    assert_eq!(p.to_filter(bin), None, "{}", p);
                }
            }
        }
    }

    #[test]
    fn test_display() {
        let p = Predicate::and(vec![Predicate::gt("age", 30), Predicate::is_null("email")]);
        assert_eq!(p.to_string(), "(age > 30) AND (email IS NULL)");
    }
}
