//! Member name mapping.
//!
//! Native operator overloads are registered under AngelScript's reserved
//! method names. The mapping is a fixed table; every other member name,
//! constructor and destructor names included, passes through unchanged.
//!
//! | Native                 | Script        |
//! |------------------------|---------------|
//! | `operator+`            | `opAdd`       |
//! | `operator-` (binary)   | `opSub`       |
//! | `operator*` (binary)   | `opMul`       |
//! | `operator/`            | `opDiv`       |
//! | `operator+=` ... `/=`  | `opAddAssign` ... `opDivAssign` |
//! | `operator==`           | `opEquals`    |
//! | `operator-` (unary)    | `opNeg`       |
//! | `operator~`            | `opCom`       |
//! | `operator=`            | `opAssign`    |

use angelscript_core::Operator;

const OPERATOR_KEYWORD: &str = "operator";

/// What the synthesizer should do with an operator member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorClass {
    /// Registered under the operator's script name.
    Mapped(Operator),
    /// `!=`, derived by the engine from `opEquals`.
    Inequality,
    /// `<`, `<=`, `>`, `>=`, derived by the engine from `opCmp`.
    Relational,
    /// `++`/`--` in prefix or postfix form.
    Step(Operator),
    /// `[]`.
    Index,
    /// `operator T()`.
    ImplicitConversion,
    /// Any operator without an entry in the mapping table.
    Unmapped,
}

/// The operator token of a member name: `+=` for `operator+=`, `int` for
/// `operator int`. `None` for ordinary names such as `operatorCount`.
pub fn operator_token(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(OPERATOR_KEYWORD)?;
    let first = rest.chars().next()?;
    if first.is_whitespace() {
        let word = rest.trim();
        return (!word.is_empty()).then_some(word);
    }
    (!first.is_alphanumeric() && first != '_').then_some(rest.trim())
}

/// Classify an operator member by name and parameter count.
///
/// Returns `None` when `name` is not an operator.
///
/// ```
/// use angelscript_core::Operator;
/// use angelscript_generator::names::{OperatorClass, classify_operator};
///
/// assert_eq!(classify_operator("operator-", 0), Some(OperatorClass::Mapped(Operator::Neg)));
/// assert_eq!(classify_operator("operator-", 1), Some(OperatorClass::Mapped(Operator::Sub)));
/// assert_eq!(classify_operator("operator<=", 1), Some(OperatorClass::Relational));
/// assert_eq!(classify_operator("length", 0), None);
/// ```
pub fn classify_operator(name: &str, arity: usize) -> Option<OperatorClass> {
    let token = operator_token(name)?;
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    let unary = arity == 0;

    let class = match compact.as_str() {
        "=" => OperatorClass::Mapped(Operator::Assign),
        "+=" => OperatorClass::Mapped(Operator::AddAssign),
        "-=" => OperatorClass::Mapped(Operator::SubAssign),
        "*=" => OperatorClass::Mapped(Operator::MulAssign),
        "/=" => OperatorClass::Mapped(Operator::DivAssign),
        "+" if !unary => OperatorClass::Mapped(Operator::Add),
        "-" if unary => OperatorClass::Mapped(Operator::Neg),
        "-" => OperatorClass::Mapped(Operator::Sub),
        "*" if !unary => OperatorClass::Mapped(Operator::Mul),
        "/" => OperatorClass::Mapped(Operator::Div),
        "==" => OperatorClass::Mapped(Operator::Equals),
        "~" => OperatorClass::Mapped(Operator::Com),
        "!=" => OperatorClass::Inequality,
        "<" | "<=" | ">" | ">=" => OperatorClass::Relational,
        "++" if unary => OperatorClass::Step(Operator::PreInc),
        "++" => OperatorClass::Step(Operator::PostInc),
        "--" if unary => OperatorClass::Step(Operator::PreDec),
        "--" => OperatorClass::Step(Operator::PostDec),
        "[]" => OperatorClass::Index,
        "new" | "delete" | "new[]" | "delete[]" => OperatorClass::Unmapped,
        _ if token.starts_with(|c: char| c.is_alphabetic() || c == '_' || c == ':') => {
            OperatorClass::ImplicitConversion
        }
        _ => OperatorClass::Unmapped,
    };
    Some(class)
}

/// Script name of a member.
///
/// Mapped operators get their reserved method name; everything else is
/// returned unchanged.
pub fn map_member_name(name: &str, arity: usize) -> &str {
    match classify_operator(name, arity) {
        Some(OperatorClass::Mapped(op)) => op.method_name(),
        _ => name,
    }
}
