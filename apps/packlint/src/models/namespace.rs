use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Namespace facts derived once per run and shared with every rule.
pub struct NamespaceInfo {
    pub namespace: Option<String>,
    pub studio_name: Option<String>,
    pub pack_name: Option<String>,
}

impl NamespaceInfo {
    /// Build from a detected namespace, splitting studio/pack on the first
    /// underscore when one exists.
    pub fn from_namespace(namespace: &str) -> Self {
        let (studio_name, pack_name) = match namespace.split_once('_') {
            Some((studio, pack)) => (Some(studio.to_string()), Some(pack.to_string())),
            None => (None, None),
        };
        NamespaceInfo {
            namespace: Some(namespace.to_string()),
            studio_name,
            pack_name,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_first_underscore() {
        let ns = NamespaceInfo::from_namespace("ffs_dark_forest");
        assert_eq!(ns.studio_name.as_deref(), Some("ffs"));
        assert_eq!(ns.pack_name.as_deref(), Some("dark_forest"));
    }

    #[test]
    fn test_no_underscore_leaves_parts_empty() {
        let ns = NamespaceInfo::from_namespace("studio");
        assert_eq!(ns.namespace(), Some("studio"));
        assert!(ns.studio_name.is_none());
        assert!(ns.pack_name.is_none());
    }
}
