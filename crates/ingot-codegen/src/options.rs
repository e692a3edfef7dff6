use indexmap::IndexMap;
use serde::Deserialize;

/// Options accepted by the transformer. Unknown keys in a deserialized
/// options document are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Output package name. `namespace` is accepted as an alias.
    #[serde(alias = "namespace")]
    pub package_name: String,
    /// Emit doc comments on generated declarations.
    pub add_comments: bool,
    /// Prefer concrete types over `interface{}`.
    pub use_strict_types: bool,
    /// Spell the empty interface `any` when widening.
    pub use_generics: bool,
    /// Append an `error` return to constructors.
    pub error_handling: bool,
    /// Prepend a context parameter to free functions.
    pub use_context: bool,
    /// Prefer standard-library crypto helpers over inline helpers.
    pub use_crypto: bool,
    // Reserved for future use.
    pub use_interfaces: bool,
    pub use_goroutines: bool,
    pub use_channels: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            package_name: "cipher".to_string(),
            add_comments: true,
            use_strict_types: true,
            use_generics: true,
            error_handling: false,
            use_context: false,
            use_crypto: true,
            use_interfaces: false,
            use_goroutines: false,
            use_channels: false,
        }
    }
}

/// Return-type information for a single OpCodes helper.
#[derive(Debug, Clone, Deserialize)]
pub struct OpCodeInfo {
    pub returns: String,
}

/// Optional knowledge base handed to the transformer for precise OpCodes
/// return-type resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeKnowledge {
    pub op_codes_types: IndexMap<String, OpCodeInfo>,
}

/// Everything a transformer instance is constructed from.
#[derive(Debug, Clone, Default)]
pub struct TransformerConfig {
    pub options: TransformOptions,
    pub type_knowledge: TypeKnowledge,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::TransformOptions;

    #[test]
    fn test_defaults() {
        let options = TransformOptions::default();
        assert_eq!(options.package_name, "cipher");
        assert!(options.add_comments);
        assert!(options.use_strict_types);
        assert!(options.use_generics);
        assert!(!options.error_handling);
        assert!(!options.use_context);
        assert!(options.use_crypto);
    }

    #[test]
    fn test_namespace_alias_and_unknown_keys() {
        let options: TransformOptions = serde_json::from_str(
            r#"{"namespace": "des", "errorHandling": true, "someFutureKey": 1}"#,
        )
        .unwrap();
        assert_eq!(options.package_name, "des");
        assert!(options.error_handling);
    }

    #[test]
    fn test_type_knowledge_document() {
        let knowledge: super::TypeKnowledge = serde_json::from_str(
            r#"{"opCodesTypes": {"RotL32": {"returns": "uint32"}}}"#,
        )
        .unwrap();
        assert_eq!(knowledge.op_codes_types["RotL32"].returns, "uint32");
    }
}
