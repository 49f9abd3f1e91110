//! Symbols — named semantic entities produced by binding.
//!
//! Symbols are immutable once constructed. The only built-in type is the
//! numeric `int`; it is constructed once per process and handed out by
//! reference, so type comparisons reduce to comparing one value.

use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Method,
    Parameter,
}

/// A named type: a registered class/interface/enum or the built-in `int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: String,
    /// Ordered type-parameter names, e.g. `["T", "U"]` for `C<T, U>`.
    pub type_params: Vec<String>,
}

static INT: LazyLock<TypeSymbol> = LazyLock::new(|| TypeSymbol {
    name: "int".to_string(),
    type_params: Vec::new(),
});

impl TypeSymbol {
    pub fn new(name: impl Into<String>, type_params: Vec<String>) -> Self {
        Self {
            name: name.into(),
            type_params,
        }
    }

    /// The single built-in numeric type.
    pub fn int() -> &'static TypeSymbol {
        &INT
    }
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A declared method parameter. Indices are zero-based and contiguous in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: TypeSymbol,
    pub index: usize,
}

impl ParameterSymbol {
    pub fn new(name: impl Into<String>, ty: TypeSymbol, index: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            index,
        }
    }
}

impl fmt::Display for ParameterSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSymbol {
    pub name: String,
    pub return_type: TypeSymbol,
    pub parameters: Vec<ParameterSymbol>,
}

impl MethodSymbol {
    pub fn new(
        name: impl Into<String>,
        return_type: TypeSymbol,
        parameters: Vec<ParameterSymbol>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
        }
    }
}

impl fmt::Display for MethodSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_int_is_shared() {
        assert!(std::ptr::eq(TypeSymbol::int(), TypeSymbol::int()));
        assert_eq!(TypeSymbol::int().name, "int");
        assert!(TypeSymbol::int().type_params.is_empty());
    }

    #[test]
    fn test_parameter_symbol() {
        let p = ParameterSymbol::new("a", TypeSymbol::int().clone(), 0);
        assert_eq!(p.index, 0);
        assert_eq!(p.to_string(), "a");
    }
}
