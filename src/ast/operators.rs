use crate::ast::lexer::{is_ident_continue, is_ident_start, is_symbol_char};
use crate::error::{FunctionError, TableError};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

pub type UnaryFunction = Arc<dyn Fn(f64) -> Result<f64, FunctionError> + Send + Sync>;
pub type BinaryFunction = Arc<dyn Fn(f64, f64) -> Result<f64, FunctionError> + Send + Sync>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OperatorRole {
    Prefix,
    Postfix,
    Binary,
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperatorRole::Prefix => "prefix",
            OperatorRole::Postfix => "postfix",
            OperatorRole::Binary => "binary",
        })
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Associativity {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Identifies one operator definition: its text and the role it plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorKey {
    pub symbol: String,
    pub role: OperatorRole,
}

impl OperatorKey {
    pub fn new(symbol: impl Into<String>, role: OperatorRole) -> Self {
        Self {
            symbol: symbol.into(),
            role,
        }
    }
}

impl fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.role, self.symbol)
    }
}

/// A binary operator. Lower precedence numbers bind tighter.
#[derive(Clone)]
pub struct BinaryOperator {
    pub precedence: i32,
    pub associativity: Associativity,
    pub(crate) function: BinaryFunction,
}

impl BinaryOperator {
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, FunctionError> {
        (self.function)(left, right)
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperator")
            .field("precedence", &self.precedence)
            .field("associativity", &self.associativity)
            .finish_non_exhaustive()
    }
}

/// Unary operator definitions, collected before validation.
#[derive(Clone, Default)]
pub struct UnaryOperators {
    entries: Vec<(OperatorKey, UnaryFunction)>,
}

impl UnaryOperators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix<F>(self, symbol: &str, function: F) -> Self
    where
        F: Fn(f64) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.insert(symbol, OperatorRole::Prefix, function)
    }

    pub fn postfix<F>(self, symbol: &str, function: F) -> Self
    where
        F: Fn(f64) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.insert(symbol, OperatorRole::Postfix, function)
    }

    fn insert<F>(mut self, symbol: &str, role: OperatorRole, function: F) -> Self
    where
        F: Fn(f64) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.entries
            .push((OperatorKey::new(symbol, role), Arc::new(function)));
        self
    }
}

/// Binary operator definitions, collected before validation.
#[derive(Clone, Default)]
pub struct BinaryOperators {
    entries: Vec<(String, BinaryOperator)>,
}

impl BinaryOperators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a left-to-right operator, the usual case.
    pub fn left<F>(self, symbol: &str, precedence: i32, function: F) -> Self
    where
        F: Fn(f64, f64) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.insert(symbol, precedence, Associativity::LeftToRight, function)
    }

    /// Registers a right-to-left operator such as exponentiation.
    pub fn right<F>(self, symbol: &str, precedence: i32, function: F) -> Self
    where
        F: Fn(f64, f64) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.insert(symbol, precedence, Associativity::RightToLeft, function)
    }

    pub fn insert<F>(
        mut self,
        symbol: &str,
        precedence: i32,
        associativity: Associativity,
        function: F,
    ) -> Self
    where
        F: Fn(f64, f64) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        self.entries.push((
            symbol.to_string(),
            BinaryOperator {
                precedence,
                associativity,
                function: Arc::new(function),
            },
        ));
        self
    }
}

/// Validated, immutable operator registry shared by every evaluation.
#[derive(Clone)]
pub struct OperatorTable {
    prefix: HashMap<String, UnaryFunction>,
    postfix: HashMap<String, UnaryFunction>,
    binary: HashMap<String, BinaryOperator>,
    // Symbol-character operator texts, longest first.
    symbols: Vec<String>,
    words: HashSet<String>,
}

impl OperatorTable {
    pub fn new(unary: UnaryOperators, binary: BinaryOperators) -> Result<Self, TableError> {
        let mut table = Self {
            prefix: HashMap::new(),
            postfix: HashMap::new(),
            binary: HashMap::new(),
            symbols: Vec::new(),
            words: HashSet::new(),
        };

        for (key, function) in unary.entries {
            table.register_text(&key.symbol)?;
            let slot = match key.role {
                OperatorRole::Postfix => &mut table.postfix,
                _ => &mut table.prefix,
            };
            if slot.insert(key.symbol.clone(), function).is_some() {
                return Err(TableError::DuplicateOperator(key));
            }
        }

        for (symbol, operator) in binary.entries {
            table.register_text(&symbol)?;
            if table.binary.insert(symbol.clone(), operator).is_some() {
                return Err(TableError::DuplicateOperator(OperatorKey::new(
                    symbol,
                    OperatorRole::Binary,
                )));
            }
        }

        table
            .symbols
            .sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        table.symbols.dedup();
        Ok(table)
    }

    fn register_text(&mut self, symbol: &str) -> Result<(), TableError> {
        let mut chars = symbol.chars();
        let Some(first) = chars.next() else {
            return Err(TableError::EmptySymbol);
        };

        if symbol.chars().all(is_symbol_char) {
            self.symbols.push(symbol.to_string());
        } else if is_ident_start(first) && chars.all(is_ident_continue) {
            self.words.insert(symbol.to_string());
        } else {
            return Err(TableError::InvalidSymbol(symbol.to_string()));
        }
        Ok(())
    }

    pub fn prefix(&self, symbol: &str) -> Option<&UnaryFunction> {
        self.prefix.get(symbol)
    }

    pub fn postfix(&self, symbol: &str) -> Option<&UnaryFunction> {
        self.postfix.get(symbol)
    }

    pub fn binary(&self, symbol: &str) -> Option<&BinaryOperator> {
        self.binary.get(symbol)
    }

    /// Looks up a unary operator by its full key.
    pub fn unary(&self, key: &OperatorKey) -> Option<&UnaryFunction> {
        match key.role {
            OperatorRole::Prefix => self.prefix(&key.symbol),
            OperatorRole::Postfix => self.postfix(&key.symbol),
            OperatorRole::Binary => None,
        }
    }

    pub fn contains(&self, key: &OperatorKey) -> bool {
        match key.role {
            OperatorRole::Binary => self.binary.contains_key(&key.symbol),
            _ => self.unary(key).is_some(),
        }
    }

    /// Longest registered symbol operator that starts `run`.
    pub(crate) fn longest_symbol<'s>(&self, run: &'s str) -> Option<&'s str> {
        self.symbols
            .iter()
            .find(|symbol| run.starts_with(symbol.as_str()))
            .map(|symbol| &run[..symbol.len()])
    }

    pub(crate) fn is_word(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

impl fmt::Debug for OperatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorTable")
            .field("prefix", &self.prefix.keys().collect::<Vec<_>>())
            .field("postfix", &self.postfix.keys().collect::<Vec<_>>())
            .field("binary", &self.binary)
            .finish()
    }
}
