//! Typed predicates guarding the path into a node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

use super::{Field, FieldId, FieldValue, InputRecord, Optype};

// =============================================================================
// Operator
// =============================================================================

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Lt,
    Le,
    Eq,
    Ne,
    Ge,
    Gt,
}

impl Operator {
    /// Parse an operator symbol.
    ///
    /// A trailing `*` (e.g. `"<=*"`) marks a predicate that also holds when
    /// the value is missing; the flag is returned alongside the operator.
    /// `/=` is accepted as an alias for `!=`.
    pub fn parse(symbol: &str) -> Result<(Self, bool), ConfigurationError> {
        let (base, or_missing) = match symbol.strip_suffix('*') {
            Some(base) => (base, true),
            None => (symbol, false),
        };
        let op = match base {
            "<" => Self::Lt,
            "<=" => Self::Le,
            "=" | "==" => Self::Eq,
            "!=" | "/=" => Self::Ne,
            ">=" => Self::Ge,
            ">" => Self::Gt,
            _ => return Err(ConfigurationError::UnknownOperator(symbol.to_owned())),
        };
        Ok((op, or_missing))
    }

    #[inline]
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Ge | Self::Gt)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Gt => ">",
        }
    }

    /// IEEE comparison; NaN never satisfies anything but `!=`.
    #[inline]
    fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Ge => lhs >= rhs,
            Self::Gt => lhs > rhs,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// Operand
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Text(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

// =============================================================================
// Missing-value policy
// =============================================================================

/// How predicates that explicitly accept missing values are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBranches {
    /// Missing-aware predicates match absent values and win over ordinary
    /// comparisons, which never match an absent value.
    #[default]
    Follow,
    /// Absent values never match; the walk halts at the current node.
    Ignore,
}

// =============================================================================
// Predicate
// =============================================================================

/// What a predicate checks once its field value has been looked up.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare { operator: Operator, operand: Operand },
    /// `field = null`
    IsMissing,
    /// `field != null`
    IsPresent,
}

/// A single typed test on one field.
///
/// Constructed through [`Predicate::new`], which rejects operator/optype
/// combinations that cannot be evaluated, so [`Predicate::evaluate`] is
/// infallible.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    field: FieldId,
    optype: Optype,
    condition: Condition,
    or_missing: bool,
}

impl Predicate {
    /// Build a predicate on `field`.
    ///
    /// `operand == None` encodes a comparison against null: `=` becomes
    /// [`Condition::IsMissing`], `!=` becomes [`Condition::IsPresent`].
    pub fn new(
        field: &Field,
        operator: Operator,
        operand: Option<Operand>,
        or_missing: bool,
    ) -> Result<Self, ConfigurationError> {
        let optype = field.optype;

        if operator.is_ordering() && !optype.is_ordered() {
            return Err(ConfigurationError::OperatorOptypeMismatch {
                field: field.id.clone(),
                operator: operator.to_string(),
                optype,
            });
        }

        let condition = match operand {
            None => match operator {
                Operator::Eq => Condition::IsMissing,
                Operator::Ne => Condition::IsPresent,
                _ => {
                    return Err(ConfigurationError::InvalidOperand {
                        field: field.id.clone(),
                        operand: "null".to_owned(),
                        optype,
                    });
                }
            },
            Some(operand) => Condition::Compare {
                operator,
                operand: coerce_operand(field, operand)?,
            },
        };

        Ok(Self {
            field: field.id.clone(),
            optype,
            condition,
            or_missing,
        })
    }

    #[inline]
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn optype(&self) -> Optype {
        self.optype
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Whether an absent value satisfies this predicate.
    pub fn accepts_missing(&self) -> bool {
        self.or_missing || matches!(self.condition, Condition::IsMissing)
    }

    /// Evaluate against a single field value (`None` = absent).
    pub fn evaluate(&self, value: Option<&FieldValue>, missing: MissingBranches) -> bool {
        let Some(value) = value.filter(|v| !v.is_missing()) else {
            return missing == MissingBranches::Follow && self.accepts_missing();
        };

        match &self.condition {
            Condition::IsMissing => false,
            Condition::IsPresent => true,
            Condition::Compare { operator, operand } => match operand {
                Operand::Number(rhs) => value
                    .as_number()
                    .is_some_and(|lhs| operator.compare(lhs, *rhs)),
                Operand::Text(rhs) => value.as_text().is_some_and(|lhs| match operator {
                    Operator::Eq => lhs == rhs.as_str(),
                    Operator::Ne => lhs != rhs.as_str(),
                    // Ordering on text operands is rejected in `new`.
                    _ => false,
                }),
            },
        }
    }

    /// Evaluate against the value this predicate's field takes in `record`.
    #[inline]
    pub fn matches(&self, record: &InputRecord, missing: MissingBranches) -> bool {
        self.evaluate(record.get(&self.field), missing)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.or_missing { "*" } else { "" };
        match &self.condition {
            Condition::Compare { operator, operand } => {
                write!(f, "{} {operator}{star} {operand}", self.field)
            }
            Condition::IsMissing => write!(f, "{} is missing", self.field),
            Condition::IsPresent => write!(f, "{} is not missing", self.field),
        }
    }
}

/// Bring an operand into the representation the field's optype compares with.
fn coerce_operand(field: &Field, operand: Operand) -> Result<Operand, ConfigurationError> {
    match (field.optype.is_ordered(), operand) {
        (true, Operand::Number(n)) => Ok(Operand::Number(n)),
        (true, Operand::Text(s)) => s
            .trim()
            .parse()
            .map(Operand::Number)
            .map_err(|_| ConfigurationError::InvalidOperand {
                field: field.id.clone(),
                operand: s,
                optype: field.optype,
            }),
        (false, Operand::Number(n)) => Ok(Operand::Text(n.to_string())),
        (false, Operand::Text(s)) => Ok(Operand::Text(s)),
    }
}

// =============================================================================
// Guard
// =============================================================================

/// Condition on the edge into a node. The root carries [`Guard::Always`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Guard {
    #[default]
    Always,
    When(Predicate),
}

impl Guard {
    #[inline]
    pub fn matches(&self, record: &InputRecord, missing: MissingBranches) -> bool {
        match self {
            Self::Always => true,
            Self::When(predicate) => predicate.matches(record, missing),
        }
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Always => None,
            Self::When(predicate) => Some(predicate),
        }
    }
}
