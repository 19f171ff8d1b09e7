//! Built-in spreadsheet functions and their metadata.
//!
//! Conventions:
//! - Spreadsheet-facing names are ALL CAPS (`SUM`, `AVERAGE`, `SQRT`).
//! - Each built-in may carry localized aliases (`SUMA`, `PROMEDIO`, `RAIZ`),
//!   accepted only when the evaluator enables them.
//! - Earlier entries win when a formula could match more than one.

/// How a built-in consumes its single argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuiltinKind {
    /// Sum of the numeric values in a range.
    Sum,
    /// Mean of the numeric values in a range, zero when there are none.
    Average,
    /// Square root of one reference or literal.
    Sqrt,
}

pub struct Builtin {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: BuiltinKind,
    #[allow(dead_code)]
    pub description: &'static str,
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "SUM",
        aliases: &["SUMA"],
        kind: BuiltinKind::Sum,
        description: "Sum of numeric values in a cell range",
    },
    Builtin {
        name: "AVERAGE",
        aliases: &["PROMEDIO"],
        kind: BuiltinKind::Average,
        description: "Average of numeric values in a cell range",
    },
    Builtin {
        name: "SQRT",
        aliases: &["RAIZ"],
        kind: BuiltinKind::Sqrt,
        description: "Square root of a cell or number",
    },
];

/// Match a normalized formula against the built-in table.
///
/// A call is `NAME(` ... `)` spanning the whole formula. Returns the built-in
/// and the text between the parentheses. Nothing inside is validated here.
pub fn match_call(formula: &str, localized: bool) -> Option<(&'static Builtin, &str)> {
    for builtin in BUILTINS {
        let aliases: &[&str] = if localized { builtin.aliases } else { &[] };
        for name in std::iter::once(&builtin.name).chain(aliases) {
            if let Some(arg) = formula
                .strip_prefix(*name)
                .and_then(|rest| rest.strip_prefix('('))
                .and_then(|rest| rest.strip_suffix(')'))
            {
                return Some((builtin, arg));
            }
        }
    }
    None
}
