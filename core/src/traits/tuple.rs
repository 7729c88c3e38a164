use crate::{SQL, SQLParam, ToSQL, Token};

/// Tuples render as a comma-separated list.
macro_rules! tuple_list {
    ($(($($T:ident $i:tt),+))*) => {$(
        impl<'a, V: SQLParam, $($T: ToSQL<'a, V>),+> ToSQL<'a, V> for ($($T,)+) {
            fn to_sql(&self) -> SQL<'a, V> {
                SQL::join([$(self.$i.to_sql()),+], Token::COMMA)
            }

            fn into_sql(self) -> SQL<'a, V> {
                SQL::join([$(self.$i.into_sql()),+], Token::COMMA)
            }
        }
    )*};
}

tuple_list! {
    (A 0)
    (A 0, B 1)
    (A 0, B 1, C 2)
    (A 0, B 1, C 2, D 3)
    (A 0, B 1, C 2, D 3, E 4)
    (A 0, B 1, C 2, D 3, E 4, F 5)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6)
    (A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7)
}
