use sporedis_model::AttributeValue;

/// An `attribute == value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub attribute: String,
    pub value: AttributeValue,
}

impl Predicate {
    pub fn new(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

impl<A, V> From<(A, V)> for Predicate
where
    A: Into<String>,
    V: Into<AttributeValue>,
{
    fn from((attribute, value): (A, V)) -> Self {
        Self::new(attribute, value)
    }
}
