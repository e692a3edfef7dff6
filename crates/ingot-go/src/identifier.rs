use genco::prelude::*;
use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Go predeclared functions that IL identifiers must not shadow, paired with
/// the replacement name the transformer emits instead.
const BUILTIN_RENAMES: &[(&str, &str)] = &[
    ("len", "length"),
    ("cap", "capacity"),
    ("copy", "copyValue"),
    ("make", "makeValue"),
    ("new", "newValue"),
    ("append", "appendValue"),
    ("delete", "deleteValue"),
    ("close", "closeValue"),
    ("panic", "panicValue"),
    ("recover", "recoverValue"),
    ("print", "printValue"),
    ("println", "printlnValue"),
    ("error", "errorValue"),
];

/// Rewrites an identifier that would shadow a Go predeclared function.
///
/// Identifiers that do not collide are returned unchanged.
pub fn escape_builtin(name: &str) -> &str {
    for (builtin, rename) in BUILTIN_RENAMES {
        if name == *builtin {
            return rename;
        }
    }
    name
}

/// Represents a Go identifier with appropriate casing rules.
///
/// Go identifiers follow specific naming conventions:
/// - Public identifiers start with uppercase (exported)
/// - Private identifiers start with lowercase (unexported)
/// - Local identifiers are used as-is, apart from builtin escaping
#[derive(Debug, Clone)]
pub enum GoIdentifier {
    /// Public/exported identifier (will be converted to UpperCamelCase)
    Public { name: String },
    /// Private/unexported identifier (will be converted to lowerCamelCase)
    Private { name: String },
    /// Local identifier (kept as written)
    Local { name: String },
}

impl GoIdentifier {
    pub fn public<T: Into<String>>(name: T) -> Self {
        Self::Public { name: name.into() }
    }

    pub fn private<T: Into<String>>(name: T) -> Self {
        Self::Private { name: name.into() }
    }

    pub fn local<T: Into<String>>(name: T) -> Self {
        Self::Local { name: name.into() }
    }

    /// Renders the identifier to its final spelling.
    pub fn to_go(&self) -> String {
        match self {
            GoIdentifier::Public { name } => name.to_upper_camel_case(),
            GoIdentifier::Private { name } => {
                escape_builtin(&name.to_lower_camel_case()).to_string()
            }
            GoIdentifier::Local { name } => escape_builtin(name).to_string(),
        }
    }
}

impl From<&GoIdentifier> for String {
    fn from(value: &GoIdentifier) -> Self {
        value.to_go()
    }
}

impl FormatInto<Go> for &GoIdentifier {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        tokens.append(self.to_go());
    }
}

impl FormatInto<Go> for GoIdentifier {
    fn format_into(self, tokens: &mut Tokens<Go>) {
        (&self).format_into(tokens)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{escape_builtin, GoIdentifier};

    #[test]
    fn test_public_identifier() {
        assert_eq!(GoIdentifier::public("hello_world").to_go(), "HelloWorld");
        assert_eq!(GoIdentifier::public("keySchedule").to_go(), "KeySchedule");
    }

    #[test]
    fn test_private_identifier() {
        assert_eq!(GoIdentifier::private("HelloWorld").to_go(), "helloWorld");
    }

    #[test]
    fn test_local_identifier_is_kept() {
        assert_eq!(GoIdentifier::local("sBox0").to_go(), "sBox0");
    }

    #[test]
    fn test_builtin_escapes() {
        assert_eq!(escape_builtin("len"), "length");
        assert_eq!(escape_builtin("cap"), "capacity");
        assert_eq!(escape_builtin("copy"), "copyValue");
        assert_eq!(escape_builtin("state"), "state");
        assert_eq!(GoIdentifier::local("len").to_go(), "length");
    }
}
