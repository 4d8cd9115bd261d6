use crate::value::Value;
use std::ops::{BitAnd, BitOr};

///
/// Predicate AST
///
/// Pure, schema-agnostic representation of structured criteria. This layer
/// carries no rendering or validation; the persister walks it once to emit
/// SQL and once to extract bind values.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
}

impl CompareOp {
    /// SQL operator token for scalar comparisons; In/NotIn render as lists.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    fn new(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Eq, value)
    }

    #[must_use]
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Ne, value)
    }

    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Lt, value)
    }

    #[must_use]
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Lte, value)
    }

    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Gt, value)
    }

    #[must_use]
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, CompareOp::Gte, value)
    }

    #[must_use]
    pub fn in_(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, CompareOp::In, Value::List(values))
    }

    #[must_use]
    pub fn not_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(field, CompareOp::NotIn, Value::List(values))
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    Compare(ComparePredicate),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Bind values in placeholder order across the whole tree.
    #[must_use]
    pub fn params(&self) -> Vec<&Value> {
        let mut params = Vec::new();
        self.collect_params(&mut params);
        params
    }

    fn collect_params<'a>(&'a self, params: &mut Vec<&'a Value>) {
        match self {
            Self::Compare(cmp) => match (&cmp.op, &cmp.value) {
                // IS NULL / IS NOT NULL render without a placeholder
                (CompareOp::Eq | CompareOp::Ne, Value::Null) => {}
                (_, Value::List(items)) => params.extend(items.iter()),
                (_, value) => params.push(value),
            },
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_params(params);
                }
            }
        }
    }
}

impl From<ComparePredicate> for Predicate {
    fn from(cmp: ComparePredicate) -> Self {
        Self::Compare(cmp)
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        match self {
            Self::And(mut children) => {
                children.push(rhs);
                Self::And(children)
            }
            other => Self::And(vec![other, rhs]),
        }
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        match self {
            Self::Or(mut children) => {
                children.push(rhs);
                Self::Or(children)
            }
            other => Self::Or(vec![other, rhs]),
        }
    }
}
