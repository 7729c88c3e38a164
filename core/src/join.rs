//! Join kinds shared by the dialect builders.

use crate::sql::{SQL, Token};
use crate::traits::SQLParam;

/// Which rows of the two sides survive a join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    const fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }

    /// `<kind> JOIN <table> ON <condition>`
    pub fn render<'a, V: SQLParam + 'a>(self, table: SQL<'a, V>, on: SQL<'a, V>) -> SQL<'a, V> {
        let mut clause = SQL::raw(self.keyword()).append(table);
        clause.push_mut(Token::ON);
        clause.append(on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Unit;

    impl SQLParam for Unit {}

    #[test]
    fn renders_keyword_table_and_condition() {
        let clause = JoinType::Full.render(SQL::<Unit>::ident("b"), SQL::raw("TRUE"));
        assert_eq!(clause.sql(), r#"FULL JOIN "b" ON TRUE"#);
    }
}
