use crate::stmt::Value;

/// A piece of SQL text produced by translating a predicate.
///
/// Fragments are dialect independent; the serializer decides how identifiers
/// are quoted, how literals are escaped and how parameters are numbered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub tokens: Vec<Token>,

    /// Variables referenced by the fragment, in first-use order.
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Raw SQL keywords and punctuation
    Sql(String),

    /// A table or column identifier
    Ident(String),

    /// A column, optionally qualified by a table alias
    Column { alias: Option<String>, name: String },

    /// A constant rendered inline
    Literal(Value),

    /// A constant or variable bound as a statement parameter
    Param(Param),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Value(Value),
    Var(String),
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment that is always true.
    pub fn always() -> Self {
        Self::sql("1 = 1")
    }

    /// A fragment that is always false.
    pub fn never() -> Self {
        Self::sql("1 = 0")
    }

    pub fn sql(text: impl Into<String>) -> Self {
        let mut fragment = Self::new();
        fragment.push_sql(text);
        fragment
    }

    /// `column = ?`, with the value bound as a parameter.
    pub fn column_eq(alias: Option<&str>, column: &str, value: impl Into<Value>) -> Self {
        let mut fragment = Self::new();
        fragment.push_column(alias, column);
        fragment.push_sql(" = ");
        fragment.push(Token::Param(Param::Value(value.into())));
        fragment
    }

    /// `column IN (?, ?, ...)`. An empty list matches nothing.
    pub fn column_in(
        alias: Option<&str>,
        column: &str,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        let mut values = values.into_iter().peekable();

        if values.peek().is_none() {
            return Self::never();
        }

        let mut fragment = Self::new();
        fragment.push_column(alias, column);
        fragment.push_sql(" IN (");
        let mut first = true;
        for value in values {
            if !first {
                fragment.push_sql(", ");
            }
            fragment.push(Token::Param(Param::Value(value)));
            first = false;
        }
        fragment.push_sql(")");
        fragment
    }

    pub fn push(&mut self, token: Token) {
        if let Token::Param(Param::Var(name)) = &token {
            self.declare(name);
        }
        self.tokens.push(token);
    }

    pub fn push_sql(&mut self, text: impl Into<String>) {
        let text = text.into();

        // Merge adjacent raw text
        if let Some(Token::Sql(prev)) = self.tokens.last_mut() {
            prev.push_str(&text);
        } else {
            self.tokens.push(Token::Sql(text));
        }
    }

    pub fn push_ident(&mut self, name: impl Into<String>) {
        self.tokens.push(Token::Ident(name.into()));
    }

    pub fn push_column(&mut self, alias: Option<&str>, name: &str) {
        self.tokens.push(Token::Column {
            alias: alias.map(str::to_string),
            name: name.to_string(),
        });
    }

    /// Appends another fragment, merging its variables.
    pub fn append(&mut self, other: Fragment) {
        for token in other.tokens {
            match token {
                Token::Sql(text) => self.push_sql(text),
                token => self.push(token),
            }
        }

        for name in &other.vars {
            self.declare(name);
        }
    }

    fn declare(&mut self, name: &str) {
        if !self.vars.iter().any(|var| var == name) {
            self.vars.push(name.to_string());
        }
    }
}
