//! SQL operator types

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Comparison operator of a boolean expression
///
/// The SQL text for each operator comes from the dialect's operator table;
/// [`BooleanOperation::as_str`] is the default spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanOperation {
    Eq,
    Neq,
    Is,
    IsNot,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Like,
    NotLike,
    ILike,
    NotILike,
    RegexpLike,
    RegexpNotLike,
    RegexpILike,
    RegexpNotILike,
}

impl BooleanOperation {
    pub const ALL: [BooleanOperation; 18] = [
        Self::Eq,
        Self::Neq,
        Self::Is,
        Self::IsNot,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
        Self::NotIn,
        Self::Like,
        Self::NotLike,
        Self::ILike,
        Self::NotILike,
        Self::RegexpLike,
        Self::RegexpNotLike,
        Self::RegexpILike,
        Self::RegexpNotILike,
    ];

    /// Get the default SQL spelling of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::ILike => "ILIKE",
            Self::NotILike => "NOT ILIKE",
            Self::RegexpLike => "~",
            Self::RegexpNotLike => "!~",
            Self::RegexpILike => "~*",
            Self::RegexpNotILike => "!~*",
        }
    }

    /// The logical negation of this operator
    pub fn invert(self) -> Self {
        match self {
            Self::Eq => Self::Neq,
            Self::Neq => Self::Eq,
            Self::Is => Self::IsNot,
            Self::IsNot => Self::Is,
            Self::Gt => Self::Lte,
            Self::Gte => Self::Lt,
            Self::Lt => Self::Gte,
            Self::Lte => Self::Gt,
            Self::In => Self::NotIn,
            Self::NotIn => Self::In,
            Self::Like => Self::NotLike,
            Self::NotLike => Self::Like,
            Self::ILike => Self::NotILike,
            Self::NotILike => Self::ILike,
            Self::RegexpLike => Self::RegexpNotLike,
            Self::RegexpNotLike => Self::RegexpLike,
            Self::RegexpILike => Self::RegexpNotILike,
            Self::RegexpNotILike => Self::RegexpILike,
        }
    }
}

impl Display for BooleanOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator of a range expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeOperation {
    Between,
    NotBetween,
}

impl RangeOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
        }
    }
}

impl Display for RangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set operation joining two SELECT statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundType {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
}

impl Display for CompoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompoundType::Union => write!(f, "UNION"),
            CompoundType::UnionAll => write!(f, "UNION ALL"),
            CompoundType::Intersect => write!(f, "INTERSECT"),
            CompoundType::IntersectAll => write!(f, "INTERSECT ALL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_spelling() {
        assert_eq!(BooleanOperation::Gt.as_str(), ">");
        assert_eq!(BooleanOperation::Neq.as_str(), "!=");
        assert_eq!(BooleanOperation::IsNot.as_str(), "IS NOT");
        assert_eq!(BooleanOperation::RegexpNotILike.as_str(), "!~*");
    }

    #[test]
    fn test_invert_is_involution() {
        for op in BooleanOperation::ALL {
            assert_eq!(op.invert().invert(), op);
        }
        assert_eq!(BooleanOperation::In.invert(), BooleanOperation::NotIn);
        assert_eq!(BooleanOperation::Gt.invert(), BooleanOperation::Lte);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", BooleanOperation::Like), "LIKE");
        assert_eq!(format!("{}", RangeOperation::NotBetween), "NOT BETWEEN");
        assert_eq!(format!("{}", CompoundType::IntersectAll), "INTERSECT ALL");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&BooleanOperation::NotILike).unwrap();
        assert_eq!(json, "\"not_i_like\"");
        let op: BooleanOperation = serde_json::from_str("\"regexp_like\"").unwrap();
        assert_eq!(op, BooleanOperation::RegexpLike);
    }
}
