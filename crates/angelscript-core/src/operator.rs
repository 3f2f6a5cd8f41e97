//! Operator methods known to the AngelScript registration API.
//!
//! AngelScript exposes operator overloads as ordinary methods with reserved
//! names (`opAdd`, `opEquals`, ...). This enum names the operators the binding
//! generator can recognise on a native class, whether or not it ends up
//! registering them.

use std::fmt;

/// Operator kinds recognised on native classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // === Assignment Operators ===
    /// `=` assignment
    Assign,
    /// `+=` add-assign
    AddAssign,
    /// `-=` subtract-assign
    SubAssign,
    /// `*=` multiply-assign
    MulAssign,
    /// `/=` divide-assign
    DivAssign,

    // === Binary Operators ===
    /// `+` addition
    Add,
    /// `-` subtraction
    Sub,
    /// `*` multiplication
    Mul,
    /// `/` division
    Div,

    // === Comparison Operators ===
    /// `opEquals` - returns bool for equality
    Equals,

    // === Unary Operators ===
    /// `-` unary negation
    Neg,
    /// `~` bitwise complement
    Com,
    /// `++x` pre-increment
    PreInc,
    /// `--x` pre-decrement
    PreDec,
    /// `x++` post-increment
    PostInc,
    /// `x--` post-decrement
    PostDec,
}

impl Operator {
    /// Get the AngelScript method name for this operator.
    pub const fn method_name(&self) -> &'static str {
        match self {
            // Assignment
            Operator::Assign => "opAssign",
            Operator::AddAssign => "opAddAssign",
            Operator::SubAssign => "opSubAssign",
            Operator::MulAssign => "opMulAssign",
            Operator::DivAssign => "opDivAssign",

            // Binary
            Operator::Add => "opAdd",
            Operator::Sub => "opSub",
            Operator::Mul => "opMul",
            Operator::Div => "opDiv",

            // Comparison
            Operator::Equals => "opEquals",

            // Unary
            Operator::Neg => "opNeg",
            Operator::Com => "opCom",
            Operator::PreInc => "opPreInc",
            Operator::PreDec => "opPreDec",
            Operator::PostInc => "opPostInc",
            Operator::PostDec => "opPostDec",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names() {
        assert_eq!(Operator::Add.method_name(), "opAdd");
        assert_eq!(Operator::AddAssign.method_name(), "opAddAssign");
        assert_eq!(Operator::Assign.method_name(), "opAssign");
        assert_eq!(Operator::Equals.method_name(), "opEquals");
        assert_eq!(Operator::Neg.method_name(), "opNeg");
        assert_eq!(Operator::Com.method_name(), "opCom");
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Operator::Mul), "opMul");
        assert_eq!(Operator::PostInc.to_string(), "opPostInc");
    }
}
