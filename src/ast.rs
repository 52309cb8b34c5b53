/// The declarable data types of the language.
///
/// A `SET name : TYPE = ...` assignment remembers one of these on the
/// binding; later assignments to the same variable are validated against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating-point number.
    Float,
    /// Text string.
    Str,
    /// Boolean.
    Bool,
    /// Duration in seconds.
    Time,
    /// Screen coordinate pair.
    Point,
}

impl TypeName {
    /// Resolves a type annotation as written in source to a `TypeName`.
    ///
    /// # Example
    /// ```
    /// use mimic::ast::TypeName;
    ///
    /// assert_eq!(TypeName::from_keyword("INT"), Some(TypeName::Int));
    /// assert_eq!(TypeName::from_keyword("LIST"), None);
    /// ```
    #[must_use]
    pub fn from_keyword(name: &str) -> Option<Self> {
        match name {
            "INT" => Some(Self::Int),
            "FLOAT" => Some(Self::Float),
            "STR" => Some(Self::Str),
            "BOOL" => Some(Self::Bool),
            "TIME" => Some(Self::Time),
            "POINT" => Some(Self::Point),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Str => "STR",
            Self::Bool => "BOOL",
            Self::Time => "TIME",
            Self::Point => "POINT",
        };
        write!(f, "{name}")
    }
}

/// Binary operators, in every precedence tier from `||` up to `**`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `|>`
    Pipe,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Pipe => "|>",
        };
        write!(f, "{symbol}")
    }
}

/// The two update operators, `++` and `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// Control statements that redirect execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// `BREAK` out of the innermost loop.
    Break,
    /// `CONTINUE` with the next iteration of the innermost loop.
    Continue,
    /// `RETURN` from the enclosing function, optionally with a value.
    Return,
    /// `YIELD` a value, suspending the enclosing function.
    Yield,
    /// `PASS`, the explicit no-op.
    Pass,
}

impl std::fmt::Display for ControlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = match self {
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::Return => "RETURN",
            Self::Yield => "YIELD",
            Self::Pass => "PASS",
        };
        write!(f, "{keyword}")
    }
}

/// Keyboard actions, `HOLD`, `RELEASE` and `PRESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Press and keep held.
    Hold,
    /// Release a held key.
    Release,
    /// Tap once.
    Press,
}

/// A single argument in a function call, positional or named.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// A positional argument.
    Positional(Expr),
    /// A `name = value` argument bound to a specific parameter.
    Named {
        /// The parameter name.
        name:  String,
        /// The argument value.
        value: Expr,
    },
}

/// The destination of a `MOVE MOUSE TO` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum MouseTarget {
    /// Explicit `(x, y)` coordinates.
    Coordinates {
        /// The x coordinate.
        x: Expr,
        /// The y coordinate.
        y: Expr,
    },
    /// An expression evaluating to a point value.
    Point(Expr),
}

/// A user-defined function introduced by `DEFUN`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The function name.
    pub name:       String,
    /// Parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// The statements of the body.
    pub body:       Vec<Stmt>,
    /// The source line of the definition.
    pub line:       usize,
}

/// One `ELSEIF` arm of a conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    /// The arm's condition.
    pub condition: Expr,
    /// The statements to run when the condition holds.
    pub body:      Vec<Stmt>,
}

/// Represents an expression node in the syntax tree.
/// Every variant carries the source line it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal, such as `42`.
    Integer {
        /// The literal value.
        value: i64,
        /// The source line of the expression.
        line:  usize,
    },
    /// Floating-point literal, such as `3.14`.
    Float {
        /// The literal value.
        value: f64,
        /// The source line of the expression.
        line:  usize,
    },
    /// String literal, such as `"hello"`.
    Str {
        /// The literal value, unescaped.
        value: String,
        /// The source line of the expression.
        line:  usize,
    },
    /// Boolean literal, `TRUE` or `FALSE`.
    Bool {
        /// The literal value.
        value: bool,
        /// The source line of the expression.
        line:  usize,
    },
    /// Time literal such as `500ms` or `2m`, normalized to seconds.
    Time {
        /// The duration in seconds.
        seconds: f64,
        /// The source line of the expression.
        line:    usize,
    },
    /// A reference to a variable, parameter or function.
    Identifier {
        /// The referenced name.
        name: String,
        /// The source line of the expression.
        line: usize,
    },
    /// A binary operation.
    BinaryOp {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
        /// The source line of the expression.
        line:  usize,
    },
    /// A call such as `f(1, b = 2)`.
    FunctionCall {
        /// The name being called.
        name:      String,
        /// The arguments, positional and named, in source order.
        arguments: Vec<Arg>,
        /// The source line of the expression.
        line:      usize,
    },
    /// An anonymous function, `LAMBDA (params) { body }`.
    Lambda {
        /// Parameter names, in declaration order.
        parameters: Vec<String>,
        /// The statements of the body.
        body:       Vec<Stmt>,
        /// The source line of the expression.
        line:       usize,
    },
    /// A coordinate constructor, `POINT(x, y)`.
    Point {
        /// The x coordinate.
        x:    Box<Expr>,
        /// The y coordinate.
        y:    Box<Expr>,
        /// The source line of the expression.
        line: usize,
    },
    /// An increment or decrement of a variable, prefix or postfix.
    Update {
        /// The variable being updated.
        name:   String,
        /// Whether the variable is incremented or decremented.
        op:     UpdateOp,
        /// `true` for `++x`, `false` for `x++`.
        prefix: bool,
        /// The source line of the expression.
        line:   usize,
    },
    /// A window existence check, `WINDOW w EXISTS`.
    WindowExists {
        /// The window title expression.
        window: Box<Expr>,
        /// The source line of the expression.
        line:   usize,
    },
}

impl Expr {
    /// Returns the source line this expression was parsed from.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Integer { line, .. }
            | Self::Float { line, .. }
            | Self::Str { line, .. }
            | Self::Bool { line, .. }
            | Self::Time { line, .. }
            | Self::Identifier { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::Lambda { line, .. }
            | Self::Point { line, .. }
            | Self::Update { line, .. }
            | Self::WindowExists { line, .. } => *line,
        }
    }
}

/// Represents a statement node in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A variable assignment, optionally typed.
    Assignment {
        /// The variable name.
        name:          String,
        /// The declared type, if the assignment carried an annotation.
        declared_type: Option<TypeName>,
        /// The assigned value.
        value:         Expr,
        /// The source line of the statement.
        line:          usize,
    },
    /// A function definition.
    FunctionDefinition(FunctionDef),
    /// `PRINT` or `PRINTLN`.
    Print {
        /// The expression to print.
        expr:    Expr,
        /// Whether a trailing newline is written.
        newline: bool,
        /// The source line of the statement.
        line:    usize,
    },
    /// `WAIT duration;`
    Wait {
        /// The duration, a number or time value.
        duration: Expr,
        /// The source line of the statement.
        line:     usize,
    },
    /// `MOVE MOUSE TO ...;`
    MoveMouse {
        /// The destination.
        target: MouseTarget,
        /// The source line of the statement.
        line:   usize,
    },
    /// `MOVE WINDOW w TO (x, y);`
    MoveWindow {
        /// The window title expression.
        window: Expr,
        /// The destination x coordinate.
        x:      Expr,
        /// The destination y coordinate.
        y:      Expr,
        /// The source line of the statement.
        line:   usize,
    },
    /// `FOCUS WINDOW w;`
    FocusWindow {
        /// The window title expression.
        window: Expr,
        /// The source line of the statement.
        line:   usize,
    },
    /// `HOLD KEY k;`, `RELEASE KEY k;` or `PRESS KEY k;`
    KeyOperation {
        /// The action performed on the key.
        action: KeyAction,
        /// The key name.
        key:    String,
        /// The source line of the statement.
        line:   usize,
    },
    /// `PRESS BUTTON b;`
    ButtonOperation {
        /// The mouse button name.
        button: String,
        /// The source line of the statement.
        line:   usize,
    },
    /// `WHILE (cond) { body }`
    While {
        /// The loop condition, re-evaluated every iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Stmt>,
        /// The source line of the statement.
        line:      usize,
    },
    /// `REPEAT n TIMES { body }`
    Repeat {
        /// The iteration count, evaluated once.
        count: Expr,
        /// The loop body.
        body:  Vec<Stmt>,
        /// The source line of the statement.
        line:  usize,
    },
    /// `IF (cond) { } ELSEIF (cond) { } ELSE { }`
    If {
        /// The primary condition.
        condition: Expr,
        /// The statements of the `IF` branch.
        then_body: Vec<Stmt>,
        /// `ELSEIF` arms, in source order.
        else_ifs:  Vec<ElseIf>,
        /// The statements of the `ELSE` branch, empty if absent.
        else_body: Vec<Stmt>,
        /// The source line of the statement.
        line:      usize,
    },
    /// `RETURN`, `BREAK`, `CONTINUE`, `YIELD` or `PASS`.
    Control {
        /// Which control statement this is.
        kind:  ControlKind,
        /// The payload for `RETURN`/`YIELD`, if present.
        value: Option<Expr>,
        /// The source line of the statement.
        line:  usize,
    },
    /// A bare expression evaluated for its effect.
    Expression {
        /// The expression.
        expr: Expr,
        /// The source line of the statement.
        line: usize,
    },
    /// A statement with no effect, e.g. a stray terminator.
    Empty {
        /// The source line of the statement.
        line: usize,
    },
}

impl Stmt {
    /// Returns the source line this statement was parsed from.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::FunctionDefinition(def) => def.line,
            Self::Assignment { line, .. }
            | Self::Print { line, .. }
            | Self::Wait { line, .. }
            | Self::MoveMouse { line, .. }
            | Self::MoveWindow { line, .. }
            | Self::FocusWindow { line, .. }
            | Self::KeyOperation { line, .. }
            | Self::ButtonOperation { line, .. }
            | Self::While { line, .. }
            | Self::Repeat { line, .. }
            | Self::If { line, .. }
            | Self::Control { line, .. }
            | Self::Expression { line, .. }
            | Self::Empty { line } => *line,
        }
    }
}

/// A full parsed script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements, in source order.
    pub statements: Vec<Stmt>,
}
