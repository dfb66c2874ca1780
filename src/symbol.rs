//! Symbol names: a stem plus an optional dotted tail path.
//! See `spec.md` §3 ("Symbol").

/// A (possibly compound) variable reference. `stem` and every entry of
/// `tail` are the upper-cased, lookup-normalized segments; `original`
/// preserves the casing as written, used only for the default-to-name
/// fallback (`spec.md` §8, scenario 4: the source repo's behavior is
/// original-case).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub stem: String,
    pub tail: Vec<String>,
    pub original: String,
}

impl Symbol {
    /// Parse a dotted identifier (as produced by the lexer, which
    /// keeps dots inside a single `Ident` lexeme) into a `Symbol`.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('.');
        let stem = parts.next().unwrap_or_default();
        let tail: Vec<String> = parts.map(|p| p.to_uppercase()).collect();

        Self {
            stem: stem.to_uppercase(),
            tail,
            original: raw.to_owned(),
        }
    }

    pub fn is_compound(&self) -> bool {
        !self.tail.is_empty()
    }

    /// The fully dotted, upper-cased name (`A.B.C`), used both for
    /// store lookups on the flattened key and for the default-to-name
    /// fallback of an unresolved dotted path.
    pub fn dotted_upper(&self) -> String {
        if self.tail.is_empty() {
            self.stem.clone()
        } else {
            format!("{}.{}", self.stem, self.tail.join("."))
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_symbol() {
        let sym = Symbol::parse("foo");
        assert_eq!(sym.stem, "FOO");
        assert!(sym.tail.is_empty());
    }

    #[test]
    fn parses_compound_symbol() {
        let sym = Symbol::parse("data.user.name");
        assert_eq!(sym.stem, "DATA");
        assert_eq!(sym.tail, vec!["USER".to_owned(), "NAME".to_owned()]);
        assert_eq!(sym.dotted_upper(), "DATA.USER.NAME");
    }
}
