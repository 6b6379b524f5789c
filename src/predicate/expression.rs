//! Store-native boolean expression algebra
//!
//! Expressions are evaluated by the store against every candidate record.
//! An operand that resolves to nothing (missing bin, unkept key) makes any
//! comparison on it false.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use crate::model::Record;
use crate::value::Value;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }
}

/// Boolean filter expression in the store's algebra
#[derive(Debug, Clone, PartialEq)]
pub enum Exp {
    /// Constant operand
    Val(Value),
    /// Value of a bin
    Bin(String),
    /// User key of the record
    Key,
    /// True if the bin is present
    BinExists(String),
    /// True if the record carries its user key
    KeyExists,
    Cmp(CmpOp, Box<Exp>, Box<Exp>),
    /// Operand equals one of the listed values
    In(Box<Exp>, Vec<Value>),
    And(Vec<Exp>),
    Or(Vec<Exp>),
    Not(Box<Exp>),
}

impl Exp {
    pub fn val(value: impl Into<Value>) -> Self {
        Exp::Val(value.into())
    }

    pub fn bin(name: impl Into<String>) -> Self {
        Exp::Bin(name.into())
    }

    pub fn cmp(op: CmpOp, left: Exp, right: Exp) -> Self {
        Exp::Cmp(op, Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(exp: Exp) -> Self {
        Exp::Not(Box::new(exp))
    }

    /// Rewrites boolean constants as integers 1 and 0
    pub fn bools_as_ints(self) -> Exp {
        fn encode(value: Value) -> Value {
            match value {
                Value::Bool(b) => Value::Int(i64::from(b)),
                other => other,
            }
        }
        match self {
            Exp::Val(v) => Exp::Val(encode(v)),
            Exp::Cmp(op, l, r) => Exp::cmp(op, l.bools_as_ints(), r.bools_as_ints()),
            Exp::In(operand, values) => Exp::In(
                Box::new(operand.bools_as_ints()),
                values.into_iter().map(encode).collect(),
            ),
            Exp::And(children) => Exp::And(children.into_iter().map(Exp::bools_as_ints).collect()),
            Exp::Or(children) => Exp::Or(children.into_iter().map(Exp::bools_as_ints).collect()),
            Exp::Not(inner) => Exp::not(inner.bools_as_ints()),
            other => other,
        }
    }

    /// Evaluates the expression as a predicate on a record
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Exp::Val(Value::Bool(b)) => *b,
            Exp::Val(_) | Exp::Bin(_) | Exp::Key => {
                matches!(self.resolve(record).as_deref(), Some(Value::Bool(true)))
            }
            Exp::BinExists(name) => record.has_bin(name),
            Exp::KeyExists => record.key.is_some(),
            Exp::Cmp(op, left, right) => {
                let (Some(l), Some(r)) = (left.resolve(record), right.resolve(record)) else {
                    return false;
                };
                match op {
                    CmpOp::Eq => values_equal(&l, &r),
                    CmpOp::Ne => !values_equal(&l, &r),
                    CmpOp::Gt => l.compare(&r) == Some(Ordering::Greater),
                    CmpOp::Ge => matches!(l.compare(&r), Some(Ordering::Greater | Ordering::Equal)),
                    CmpOp::Lt => l.compare(&r) == Some(Ordering::Less),
                    CmpOp::Le => matches!(l.compare(&r), Some(Ordering::Less | Ordering::Equal)),
                }
            }
            Exp::In(operand, values) => match operand.resolve(record) {
                Some(v) => values.iter().any(|candidate| values_equal(&v, candidate)),
                None => false,
            },
            Exp::And(children) => children.iter().all(|c| c.matches(record)),
            Exp::Or(children) => children.iter().any(|c| c.matches(record)),
            Exp::Not(inner) => !inner.matches(record),
        }
    }

    /// Resolves an operand to a value
    fn resolve<'r>(&'r self, record: &'r Record) -> Option<Cow<'r, Value>> {
        match self {
            Exp::Val(v) => Some(Cow::Borrowed(v)),
            Exp::Bin(name) => record
                .bin(name)
                .filter(|v| !v.is_nil())
                .map(Cow::Borrowed),
            Exp::Key => record.key.as_ref().map(|k| Cow::Borrowed(&k.user_key)),
            other => Some(Cow::Owned(Value::Bool(other.matches(record)))),
        }
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match a.compare(b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Val(v) => write!(f, "{}", v),
            Exp::Bin(name) => write!(f, "bin({})", name),
            Exp::Key => write!(f, "key()"),
            Exp::BinExists(name) => write!(f, "bin_exists({})", name),
            Exp::KeyExists => write!(f, "key_exists()"),
            Exp::Cmp(op, l, r) => write!(f, "{} {} {}", l, op.symbol(), r),
            Exp::In(operand, values) => {
                write!(f, "{} in {}", operand, Value::List(values.clone()))
            }
            Exp::And(children) => write_joined(f, children, " and ", "true"),
            Exp::Or(children) => write_joined(f, children, " or ", "false"),
            Exp::Not(inner) => write!(f, "not({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Exp], sep: &str, empty: &str) -> fmt::Result {
    if children.is_empty() {
        return write!(f, "{}", empty);
    }
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Key;
    use std::collections::BTreeMap;

    fn record(bins: &[(&str, Value)], key: Option<i64>) -> Record {
        let bins: BTreeMap<String, Value> = bins
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let key = key.map(|k| Key::new("test", "users", Value::Int(k)).unwrap());
        Record::new(key, bins, 1)
    }

    #[test]
    fn test_comparison() {
        let rec = record(&[("age", Value::Int(35))], None);
        assert!(Exp::cmp(CmpOp::Gt, Exp::bin("age"), Exp::val(30)).matches(&rec));
        assert!(!Exp::cmp(CmpOp::Lt, Exp::bin("age"), Exp::val(30)).matches(&rec));
        assert!(Exp::cmp(CmpOp::Eq, Exp::bin("age"), Exp::val(35.0)).matches(&rec));
    }

    #[test]
    fn test_missing_bin_never_compares() {
        let rec = record(&[("name", Value::from("Alice"))], None);
        assert!(!Exp::cmp(CmpOp::Eq, Exp::bin("age"), Exp::val(1)).matches(&rec));
        assert!(!Exp::cmp(CmpOp::Ne, Exp::bin("age"), Exp::val(1)).matches(&rec));
    }

    #[test]
    fn test_existence() {
        let keyed = record(&[("name", Value::from("Alice"))], Some(1));
        let unkeyed = record(&[("name", Value::Nil)], None);

        assert!(Exp::KeyExists.matches(&keyed));
        assert!(!Exp::KeyExists.matches(&unkeyed));
        assert!(Exp::BinExists("name".into()).matches(&keyed));
        // nil bins count as absent
        assert!(!Exp::BinExists("name".into()).matches(&unkeyed));
    }

    #[test]
    fn test_key_operand() {
        let rec = record(&[], Some(7));
        assert!(Exp::cmp(CmpOp::Eq, Exp::Key, Exp::val(7)).matches(&rec));
    }

    #[test]
    fn test_empty_connectives() {
        let rec = record(&[], None);
        assert!(Exp::And(vec![]).matches(&rec));
        assert!(!Exp::Or(vec![]).matches(&rec));
    }

    #[test]
    fn test_display() {
        let exp = Exp::And(vec![
            Exp::cmp(CmpOp::Gt, Exp::bin("age"), Exp::val(30)),
            Exp::not(Exp::BinExists("email".into())),
        ]);
        assert_eq!(exp.to_string(), "(bin(age) > 30 and not(bin_exists(email)))");
    }
}
