//! The built-in types and functions, and how they are spelled in the target
//! language.

use crate::types::Type;

/// A built-in function overload.
#[derive(Debug, PartialEq, Eq)]
pub struct Signature {
    pub params: &'static [Type],
    pub ret: Type,
    /// The name emitted at call sites.
    pub target: &'static str,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Read-only registry consulted by the type checker and the code generator.
pub trait Catalog: Sync {
    /// Resolves a type name as written in a declaration.
    fn resolve_type(&self, name: &str) -> Option<Type>;

    /// The target-language spelling of `ty`.
    fn target_type(&self, ty: Type) -> &'static str;

    /// Looks up a function by name and number of arguments.
    fn function(&self, name: &str, arity: usize) -> Option<&'static Signature>;
}

/// The Java standard library.
#[derive(Copy, Clone, Debug, Default)]
pub struct Java;

pub static JAVA: Java = Java;

static TYPES: phf::Map<&'static str, Type> = phf::phf_map! {
    "BOOLEAN" => Type::Boolean,
    "INTEGER" => Type::Integer,
    "DECIMAL" => Type::Decimal,
    "STRING" => Type::String,
    "VOID" => Type::Void,
    "ANY" => Type::Any,
};

static FUNCTIONS: phf::Map<&'static str, &'static [Signature]> = phf::phf_map! {
    "PRINT" => &[
        Signature {
            params: &[Type::Any],
            ret: Type::Void,
            target: "System.out.println",
        },
    ],
};

impl Catalog for Java {
    fn resolve_type(&self, name: &str) -> Option<Type> {
        TYPES.get(name).copied()
    }

    fn target_type(&self, ty: Type) -> &'static str {
        match ty {
            Type::Boolean => "boolean",
            Type::Integer => "int",
            Type::Decimal => "double",
            Type::String => "String",
            Type::Void => "void",
            Type::Any => "Object",
        }
    }

    fn function(&self, name: &str, arity: usize) -> Option<&'static Signature> {
        FUNCTIONS
            .get(name)?
            .iter()
            .find(|signature| signature.arity() == arity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_type_by_its_source_name() {
        for &ty in Type::ALL {
            assert_eq!(JAVA.resolve_type(ty.name()), Some(ty));
        }
        assert_eq!(JAVA.resolve_type("boolean"), None);
        assert_eq!(JAVA.resolve_type("FLOAT"), None);
    }

    #[test]
    fn print_takes_exactly_one_argument() {
        let print = JAVA.function("PRINT", 1).expect("PRINT/1 is built in");
        assert_eq!(print.params, &[Type::Any]);
        assert_eq!(print.ret, Type::Void);
        assert_eq!(print.target, "System.out.println");

        assert_eq!(JAVA.function("PRINT", 0), None);
        assert_eq!(JAVA.function("PRINT", 3), None);
        assert_eq!(JAVA.function("print", 1), None);
    }
}
