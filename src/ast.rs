use std::fmt;

use serde::Serialize;

/// A numeric literal as written in source.
///
/// Integers and reals stay distinct so that integer arithmetic remains exact;
/// in the serialized tree both appear as plain JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Real(f64),
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

/// The root of a parsed program.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// The top-level statements, in source order.
    pub statements: Vec<Statement>,
    /// Whether the program was wrapped in `begin ... end`.
    pub wrapped:    bool,
    /// Line number of the first token.
    pub line:       usize,
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Expressions produce values: literals, variable reads, arithmetic and
/// function calls. Comparisons and logical operators live in [`Condition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Expr {
    /// A numeric literal.
    NumberLiteral {
        /// The constant value.
        value: Number,
        /// Line number in the source code.
        line:  usize,
    },
    /// A string literal, escapes already decoded.
    StringLiteral {
        /// The constant value.
        value: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// `true` or `false`.
    BooleanLiteral {
        /// The constant value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    VarRef {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// An arithmetic operation.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A prefix `+` or `-`.
    UnaryOp {
        /// The unary operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Function call expression (e.g. `square(x)`).
    Call {
        /// Name of the function being called.
        name:      String,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
}

/// A boolean-valued construct used by `if`, `elseif` and `while`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Condition {
    /// A single, non-chainable comparison.
    Compare {
        /// The comparison operator.
        op:    ComparisonOperator,
        /// Left operand.
        left:  Expr,
        /// Right operand.
        right: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// `and` / `or`, evaluated with short-circuiting.
    LogicalOp {
        /// The logical operator.
        op:    LogicalOperator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Prefix `not`.
    Not {
        /// The negated condition.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A bare expression, tested for truthiness.
    CondExpr {
        /// The tested expression.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A parenthesised condition.
    GroupedCondition {
        /// The inner condition.
        inner: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
}

/// Represents a user-defined function definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:   String,
    /// The parameter names, in order.
    pub params: Vec<String>,
    /// The statements executed when the function is called.
    pub body:   Vec<Statement>,
    /// Line number in the source code.
    pub line:   usize,
}

/// How the induction variable of a `for` loop is introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Induction {
    /// `for i = ...` reuses an already declared variable.
    Existing,
    /// `for let i = ...` declares a loop-scoped variable.
    Declared,
}

/// A counted `for` loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForLoop {
    /// Whether the loop variable is declared by the loop.
    pub induction: Induction,
    /// The loop variable name.
    pub var:       String,
    /// Initial value.
    pub start:     Expr,
    /// Inclusive bound.
    pub end:       Expr,
    /// Increment per iteration; `1` when absent.
    pub step:      Option<Expr>,
    /// The loop body.
    pub body:      Vec<Statement>,
    /// Line number in the source code.
    pub line:      usize,
}

/// The tail of an `if` statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum ElsePart {
    /// A final `else` branch.
    Else {
        /// The statements of the branch.
        body: Vec<Statement>,
        /// Line number in the source code.
        line: usize,
    },
    /// An `elseif` branch, possibly followed by more branches.
    ElseIf {
        /// The branch condition.
        condition: Condition,
        /// The statements of the branch.
        body:      Vec<Statement>,
        /// Whatever follows this branch.
        else_part: Option<Box<Self>>,
        /// Line number in the source code.
        line:      usize,
    },
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum Statement {
    /// A variable declaration using `let`.
    Declare {
        /// The name of the variable.
        name:  String,
        /// The initial value of the variable.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A variable assignment binding a name to an expression.
    Assign {
        /// The name of the variable.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A standalone expression evaluated for its side effects.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `print(a, b, ...)`.
    Print {
        /// The printed expressions.
        items: Vec<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A conventional `if` with optional `elseif`/`else` branches.
    If {
        /// The branch condition.
        condition:   Condition,
        /// Statements run when the condition holds.
        then_branch: Vec<Statement>,
        /// The remaining branches.
        else_part:   Option<Box<ElsePart>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// A counted loop.
    For(ForLoop),
    /// A condition-controlled loop.
    While {
        /// The loop condition.
        condition: Condition,
        /// The loop body.
        body:      Vec<Statement>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A user-defined function declaration.
    FunctionDef(FunctionDef),
    /// `return;` or `return expr;`.
    Return {
        /// The returned value, if any.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `break;`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue;`
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// `set x to e;`, `add e to x;`, `sub e from x;`, `mult x by e;`,
    /// `div x by e;`.
    NaturalLangOp {
        /// The operation.
        op:      NaturalOperator,
        /// The updated variable.
        target:  String,
        /// The other operand.
        operand: Expr,
        /// Line number in the source code.
        line:    usize,
    },
    /// `if x is <op> e then ...`.
    NaturalLangIf {
        /// The tested variable.
        name:  String,
        /// The comparison operator.
        op:    ComparisonOperator,
        /// The compared value.
        value: Expr,
        /// Statements run when the comparison holds.
        body:  Vec<Statement>,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::For(ForLoop { line, .. }) | Self::FunctionDef(FunctionDef { line, .. }) => *line,
            Self::Declare { line, .. }
            | Self::Assign { line, .. }
            | Self::Expression { line, .. }
            | Self::Print { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::Return { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::NaturalLangOp { line, .. }
            | Self::NaturalLangIf { line, .. } => *line,
        }
    }
}

/// Represents an arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    /// Addition (`+`)
    #[serde(rename = "+")]
    Add,
    /// Subtraction (`-`)
    #[serde(rename = "-")]
    Sub,
    /// Multiplication (`*`)
    #[serde(rename = "*")]
    Mul,
    /// Division (`/`)
    #[serde(rename = "/")]
    Div,
}

/// Represents a comparison operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ComparisonOperator {
    /// Less than (`<`)
    #[serde(rename = "<")]
    Less,
    /// Greater than (`>`)
    #[serde(rename = ">")]
    Greater,
    /// Less than or equal (`<=`)
    #[serde(rename = "<=")]
    LessEqual,
    /// Greater than or equal (`>=`)
    #[serde(rename = ">=")]
    GreaterEqual,
    /// Equal to (`==`)
    #[serde(rename = "==")]
    Equal,
    /// Not equal to (`!=`)
    #[serde(rename = "!=")]
    NotEqual,
}

/// Represents a binary logical operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    /// Identity (e.g. `+x`).
    #[serde(rename = "+")]
    Plus,
    /// Arithmetic negation (e.g. `-x`).
    #[serde(rename = "-")]
    Negate,
}

/// The verb of a natural-language statement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NaturalOperator {
    /// `set x to e`
    Set,
    /// `add e to x`
    Add,
    /// `sub e from x`
    Sub,
    /// `mult x by e`
    Mult,
    /// `div x by e`
    Div,
}

impl NaturalOperator {
    /// The arithmetic operator applied to the current value, or `None` for
    /// `set`, which replaces it.
    #[must_use]
    pub const fn arithmetic(self) -> Option<BinaryOperator> {
        match self {
            Self::Set => None,
            Self::Add => Some(BinaryOperator::Add),
            Self::Sub => Some(BinaryOperator::Sub),
            Self::Mult => Some(BinaryOperator::Mul),
            Self::Div => Some(BinaryOperator::Div),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Plus => "+",
                        Self::Negate => "-",
                    })
    }
}
