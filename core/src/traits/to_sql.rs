use crate::sql::{SQL, Token};
use crate::traits::SQLParam;

/// Anything that renders to a statement fragment.
///
/// `'a` bounds borrowed parameter values carried by the fragment.
pub trait ToSQL<'a, V: SQLParam> {
    fn to_sql(&self) -> SQL<'a, V>;

    /// Like [`ToSQL::to_sql`], without the clone for types that own a fragment.
    fn into_sql(self) -> SQL<'a, V>
    where
        Self: Sized,
    {
        self.to_sql()
    }

    fn alias(&self, alias: &'static str) -> SQL<'a, V> {
        self.to_sql().alias(alias)
    }
}

impl<'a, V: SQLParam, T: ToSQL<'a, V>> ToSQL<'a, V> for &T {
    fn to_sql(&self) -> SQL<'a, V> {
        T::to_sql(self)
    }
}

/// `None` is a literal NULL rather than a bound parameter.
impl<'a, V: SQLParam + 'a, T: ToSQL<'a, V>> ToSQL<'a, V> for Option<T> {
    fn to_sql(&self) -> SQL<'a, V> {
        match self {
            Some(value) => value.to_sql(),
            None => SQL::token(Token::NULL),
        }
    }
}

impl<'a, V: SQLParam + 'a, T: ToSQL<'a, V>> ToSQL<'a, V> for Vec<T> {
    fn to_sql(&self) -> SQL<'a, V> {
        SQL::join(self, Token::COMMA)
    }

    fn into_sql(self) -> SQL<'a, V> {
        SQL::join(self, Token::COMMA)
    }
}

impl<'a, V: SQLParam + 'a, T: ToSQL<'a, V>, const N: usize> ToSQL<'a, V> for [T; N] {
    fn to_sql(&self) -> SQL<'a, V> {
        SQL::join(self, Token::COMMA)
    }

    fn into_sql(self) -> SQL<'a, V> {
        SQL::join(self, Token::COMMA)
    }
}

impl<'a, V: SQLParam + 'a + From<&'a str>> ToSQL<'a, V> for &'a str {
    fn to_sql(&self) -> SQL<'a, V> {
        SQL::param(V::from(*self))
    }
}

impl<'a, V: SQLParam + 'a + From<String>> ToSQL<'a, V> for String {
    fn to_sql(&self) -> SQL<'a, V> {
        SQL::param(V::from(self.clone()))
    }

    fn into_sql(self) -> SQL<'a, V> {
        SQL::param(V::from(self))
    }
}

/// Copy values bind by value.
macro_rules! bind_copy {
    ($($ty:ty),* $(,)?) => {$(
        impl<'a, V: SQLParam + 'a + From<$ty>> ToSQL<'a, V> for $ty {
            fn to_sql(&self) -> SQL<'a, V> {
                SQL::param(V::from(*self))
            }
        }
    )*};
}

bind_copy!(i16, i32, i64, f32, f64, bool);

#[cfg(feature = "uuid")]
bind_copy!(uuid::Uuid);

#[cfg(feature = "chrono")]
bind_copy!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::FixedOffset>,
);
