use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, Value};
use std::str::FromStr;

use crate::errors::ServiceError;

/// Composable filter over an entity's columns, addressed by field name.
///
/// Field names are resolved when the specification is turned into a
/// [`Condition`], so the same specification can be applied to any entity
/// that has the named columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Specification {
    Equals(String, Value),
    Contains(String, String),
    GreaterThan(String, Value),
    LessThan(String, Value),
    In(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Specification>),
    Or(Vec<Specification>),
}

impl Specification {
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Specification::Equals(field.into(), value.into())
    }

    /// SQL `LIKE '%value%'`.
    pub fn field_contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Specification::Contains(field.into(), value.into())
    }

    pub fn field_greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Specification::GreaterThan(field.into(), value.into())
    }

    pub fn field_less_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Specification::LessThan(field.into(), value.into())
    }

    pub fn field_in<V, I>(field: impl Into<String>, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Specification::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn field_is_null(field: impl Into<String>) -> Self {
        Specification::IsNull(field.into())
    }

    pub fn field_is_not_null(field: impl Into<String>) -> Self {
        Specification::IsNotNull(field.into())
    }

    /// Conjunction; an empty list matches everything.
    pub fn all(specs: impl IntoIterator<Item = Specification>) -> Self {
        Specification::And(specs.into_iter().collect())
    }

    /// Disjunction; an empty list matches nothing.
    pub fn any(specs: impl IntoIterator<Item = Specification>) -> Self {
        Specification::Or(specs.into_iter().collect())
    }

    pub fn and(self, other: Specification) -> Self {
        match self {
            Specification::And(mut specs) => {
                specs.push(other);
                Specification::And(specs)
            }
            spec => Specification::And(vec![spec, other]),
        }
    }

    pub fn or(self, other: Specification) -> Self {
        match self {
            Specification::Or(mut specs) => {
                specs.push(other);
                Specification::Or(specs)
            }
            spec => Specification::Or(vec![spec, other]),
        }
    }

    /// Resolves field names against `E`'s columns and builds the condition.
    pub fn to_condition<E: EntityTrait>(&self) -> Result<Condition, ServiceError> {
        let condition = match self {
            Specification::Equals(field, value) => {
                Condition::all().add(resolve_column::<E>(field)?.eq(value.clone()))
            }
            Specification::Contains(field, value) => {
                Condition::all().add(resolve_column::<E>(field)?.contains(value.as_str()))
            }
            Specification::GreaterThan(field, value) => {
                Condition::all().add(resolve_column::<E>(field)?.gt(value.clone()))
            }
            Specification::LessThan(field, value) => {
                Condition::all().add(resolve_column::<E>(field)?.lt(value.clone()))
            }
            Specification::In(field, values) => {
                Condition::all().add(resolve_column::<E>(field)?.is_in(values.iter().cloned()))
            }
            Specification::IsNull(field) => {
                Condition::all().add(resolve_column::<E>(field)?.is_null())
            }
            Specification::IsNotNull(field) => {
                Condition::all().add(resolve_column::<E>(field)?.is_not_null())
            }
            Specification::And(specs) => specs.iter().try_fold(Condition::all(), |acc, spec| {
                Ok::<_, ServiceError>(acc.add(spec.to_condition::<E>()?))
            })?,
            Specification::Or(specs) => specs.iter().try_fold(Condition::any(), |acc, spec| {
                Ok::<_, ServiceError>(acc.add(spec.to_condition::<E>()?))
            })?,
        };
        Ok(condition)
    }
}

/// Looks up a column of `E` by its snake_case or camelCase name.
pub fn resolve_column<E: EntityTrait>(field: &str) -> Result<E::Column, ServiceError> {
    E::Column::from_str(field).map_err(|_| {
        ServiceError::InvalidInput(format!(
            "Unknown field '{}' on {}",
            field,
            E::default().table_name()
        ))
    })
}

/// `LOWER(col) LIKE '%needle%' ESCAPE '\'` with the needle lower-cased.
/// Wildcards in `needle` match literally.
pub fn contains_ignore_case<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    lower(column).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `LOWER(col) = needle` with the needle lower-cased.
pub fn equals_ignore_case<C: ColumnTrait>(column: C, value: &str) -> SimpleExpr {
    lower(column).eq(value.to_lowercase())
}

fn lower<C: ColumnTrait>(column: C) -> Expr {
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{product, Product};
    use sea_orm::{DbBackend, IdenStatic, QueryFilter, QueryTrait};

    fn sql(spec: &Specification) -> String {
        Product::find()
            .filter(spec.to_condition::<Product>().unwrap())
            .build(DbBackend::Sqlite)
            .to_string()
    }

    #[test]
    fn camel_and_snake_case_fields_resolve_to_the_same_column() {
        let snake = resolve_column::<Product>("category_id").unwrap();
        let camel = resolve_column::<Product>("categoryId").unwrap();
        assert_eq!(snake.as_str(), product::Column::CategoryId.as_str());
        assert_eq!(camel.as_str(), "category_id");
    }

    #[test]
    fn unknown_field_is_invalid_input() {
        let err = Specification::field_equals("colour", "red")
            .to_condition::<Product>()
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn combinators_nest() {
        let spec = Specification::field_contains("name", "bolt")
            .and(Specification::field_is_not_null("sku"))
            .or(Specification::field_in("category_id", [1_i64, 2]));
        let rendered = sql(&spec);
        assert!(rendered.contains(r#""products"."name" LIKE '%bolt%'"#), "{}", rendered);
        assert!(rendered.contains(r#""products"."sku" IS NOT NULL"#), "{}", rendered);
        assert!(rendered.contains(r#""products"."category_id" IN (1, 2)"#), "{}", rendered);
        assert!(rendered.contains(" OR "), "{}", rendered);
    }

    #[test]
    fn case_insensitive_helpers_lower_both_sides() {
        let rendered = Product::find()
            .filter(contains_ignore_case(product::Column::Name, "BoLt"))
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(rendered.contains(r#"LOWER("products"."name") LIKE '%bolt%'"#), "{}", rendered);
        assert!(rendered.contains("ESCAPE"), "{}", rendered);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b%c"), r"a\_b\%c");
        assert_eq!(escape_like(r"C:\tmp"), r"C:\\tmp");
        assert_eq!(escape_like("plain"), "plain");
    }
}
