use std::fmt;

/// A namespace and a type name, borrowed from the `#Strings` heap.
///
/// Nested types have an empty namespace. Two names are equal when both parts are equal,
/// regardless of where the text is stored, so a name read from an image can be compared
/// against a `'static` catalog entry.
///
/// ```rust
/// use winmdscope::metadata::typesystem::QualifiedName;
///
/// let name = QualifiedName::new("System", "FlagsAttribute");
/// assert_eq!(name.to_string(), "System.FlagsAttribute");
/// assert_eq!(QualifiedName::new("", "Nested").to_string(), "Nested");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName<'a> {
    /// Dotted namespace, may be empty
    pub namespace: &'a str,
    /// Simple type name
    pub name: &'a str,
}

impl<'a> QualifiedName<'a> {
    /// Create a new name from its two parts
    #[must_use]
    pub const fn new(namespace: &'a str, name: &'a str) -> Self {
        QualifiedName { namespace, name }
    }

    /// Returns `true` if this names `namespace.name`
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equality_by_content() {
        let namespace = String::from("Windows.Win32.Foundation.Metadata");
        let name = String::from("GuidAttribute");
        let read = QualifiedName::new(&namespace, &name);

        const CATALOG: QualifiedName<'static> =
            QualifiedName::new("Windows.Win32.Foundation.Metadata", "GuidAttribute");

        assert_eq!(read, CATALOG);
        assert!(read.is("Windows.Win32.Foundation.Metadata", "GuidAttribute"));

        let set: HashSet<QualifiedName> = [CATALOG].into_iter().collect();
        assert!(set.contains(&read));
    }
}
