use std::fmt;

/// The closed set of types of the language.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Decimal,
    String,
    /// No value. Function results may be void; variables may not.
    Void,
    /// Only ever an assignment target: accepts any non-void value.
    Any,
}

impl Type {
    pub const ALL: &[Type] = &[
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::String,
        Type::Void,
        Type::Any,
    ];

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }

    /// Whether a value of this type may flow into a slot of type `target`.
    pub fn is_assignable_to(self, target: Type) -> bool {
        match (self, target) {
            (ty, target) if ty == target => true,
            (Type::Integer, Type::Decimal) => true,
            (Type::Void, Type::Any) => false,
            (_, Type::Any) => true,
            _ => false,
        }
    }

    /// The name as written in source programs.
    pub const fn name(self) -> &'static str {
        match self {
            Type::Boolean => "BOOLEAN",
            Type::Integer => "INTEGER",
            Type::Decimal => "DECIMAL",
            Type::String => "STRING",
            Type::Void => "VOID",
            Type::Any => "ANY",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_assignable_to() {
        for &ty in Type::ALL {
            assert!(ty.is_assignable_to(ty), "{ty} must be assignable to itself");
        }

        assert!(Type::Integer.is_assignable_to(Type::Decimal));
        assert!(!Type::Decimal.is_assignable_to(Type::Integer));

        assert!(Type::String.is_assignable_to(Type::Any));
        assert!(Type::Boolean.is_assignable_to(Type::Any));
        assert!(!Type::Void.is_assignable_to(Type::Any));

        assert!(!Type::Boolean.is_assignable_to(Type::String));
        assert!(!Type::Any.is_assignable_to(Type::String));
        assert!(!Type::Integer.is_assignable_to(Type::Void));
    }
}
