/// SQL keywords and punctuation.
///
/// Multi-word keywords (`GROUP BY`, `ORDER BY`) are single tokens so that
/// spacing stays a property of the chunk stream.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    // Statements
    SELECT,
    DISTINCT,
    ON,
    FROM,
    WHERE,
    GROUP_BY,
    HAVING,
    ORDER_BY,
    LIMIT,
    OFFSET,
    UPDATE,
    SET,
    DELETE,
    INSERT,
    INTO,
    VALUES,
    RETURNING,
    DEFAULT,

    // Operators and predicates
    AND,
    OR,
    NOT,
    AS,
    IN,
    IS,
    NULL,
    LIKE,
    BETWEEN,
    ASC,
    DESC,
    TRUE,
    FALSE,

    // Punctuation
    LPAREN,
    RPAREN,
    COMMA,
    SEMI,
    DOT,
    STAR,

    // Comparison and arithmetic
    EQ,
    NE,
    LT,
    GT,
    LE,
    GE,
    PLUS,
    MINUS,
    SLASH,
    REM,
}

impl Token {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::DISTINCT => "DISTINCT",
            Token::ON => "ON",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::GROUP_BY => "GROUP BY",
            Token::HAVING => "HAVING",
            Token::ORDER_BY => "ORDER BY",
            Token::LIMIT => "LIMIT",
            Token::OFFSET => "OFFSET",
            Token::UPDATE => "UPDATE",
            Token::SET => "SET",
            Token::DELETE => "DELETE",
            Token::INSERT => "INSERT",
            Token::INTO => "INTO",
            Token::VALUES => "VALUES",
            Token::RETURNING => "RETURNING",
            Token::DEFAULT => "DEFAULT",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::AS => "AS",
            Token::IN => "IN",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::LIKE => "LIKE",
            Token::BETWEEN => "BETWEEN",
            Token::ASC => "ASC",
            Token::DESC => "DESC",
            Token::TRUE => "TRUE",
            Token::FALSE => "FALSE",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::COMMA => ",",
            Token::SEMI => ";",
            Token::DOT => ".",
            Token::STAR => "*",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::GT => ">",
            Token::LE => "<=",
            Token::GE => ">=",
            Token::PLUS => "+",
            Token::MINUS => "-",
            Token::SLASH => "/",
            Token::REM => "%",
        }
    }

    /// Binary operators always get a space on both sides.
    #[inline]
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ
                | Token::NE
                | Token::LT
                | Token::GT
                | Token::LE
                | Token::GE
                | Token::PLUS
                | Token::MINUS
                | Token::SLASH
                | Token::REM
                | Token::STAR
        )
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
