//! The framework stub generator.
//!
//! Lowered algorithm code leans on a small runtime of record types, enums
//! and base structs. Whatever the transformation touched is emitted at the
//! top of the output file, closed transitively: any algorithm base forces
//! `BaseAlgorithm`, which forces every enum and helper record it mentions.

use ingot_go::{GoDecl, GoExpr, GoField, GoParam, GoStmt, GoType};

use crate::{enums, helpers, pascal, Transformer};

/// Concrete framework bases that keep their own struct name and embed
/// `BaseAlgorithm`, in emission order.
pub const CONCRETE_BASES: &[&str] = &[
    "BlockCipherAlgorithm",
    "StreamCipherAlgorithm",
    "HashFunctionAlgorithm",
    "AsymmetricAlgorithm",
    "MacAlgorithm",
    "KdfAlgorithm",
    "AeadAlgorithm",
    "ChecksumAlgorithm",
    "CompressionAlgorithm",
    "ClassicalCipherAlgorithm",
    "EncodingAlgorithm",
];

/// Framework bases without fields of their own; they collapse to
/// `BaseAlgorithm`.
const PLAIN_BASES: &[&str] = &[
    "Algorithm",
    "ErrorCorrectionAlgorithm",
    "PaddingAlgorithm",
    "CipherModeAlgorithm",
    "RandomGenerationAlgorithm",
];

/// Instance bases that embed themselves, in emission order.
pub const INSTANCE_BASES: &[&str] = &[
    "IAlgorithmInstance",
    "IBlockCipherInstance",
    "IStreamCipherInstance",
    "IHashFunctionInstance",
];

/// Instance bases that collapse to `IAlgorithmInstance`.
const PLAIN_INSTANCE_BASES: &[&str] = &[
    "IMacInstance",
    "IKdfInstance",
    "IAeadInstance",
    "IErrorCorrectionInstance",
    "IRandomGeneratorInstance",
];

/// Helper records used as value types in algorithm metadata, in emission
/// order.
pub const HELPER_RECORDS: &[&str] = &[
    "KeySize",
    "LinkItem",
    "TestCase",
    "Vulnerability",
    "TestCategory",
];

/// Maps an IL base-class name to the struct the derived class embeds.
/// Returns `None` for names that are not framework bases.
pub fn map_base_class(name: &str) -> Option<&'static str> {
    if name == "BaseAlgorithm" {
        return Some("BaseAlgorithm");
    }
    if let Some(base) = CONCRETE_BASES.iter().find(|base| **base == name) {
        return Some(base);
    }
    if PLAIN_BASES.contains(&name) {
        return Some("BaseAlgorithm");
    }
    if let Some(base) = INSTANCE_BASES.iter().find(|base| **base == name) {
        return Some(base);
    }
    if PLAIN_INSTANCE_BASES.contains(&name) {
        return Some("IAlgorithmInstance");
    }
    None
}

pub fn is_instance_base(name: &str) -> bool {
    INSTANCE_BASES.contains(&name) || PLAIN_INSTANCE_BASES.contains(&name)
}

pub fn is_helper_record(name: &str) -> bool {
    HELPER_RECORDS.contains(&name)
}

/// Positional constructor arguments → named fields, per helper record.
/// Shorter argument lists fill from the left.
pub fn record_fields(name: &str) -> Option<&'static [&'static str]> {
    Some(match name {
        "KeySize" => &["MinSize", "MaxSize", "Step"],
        "LinkItem" => &["Text", "Uri"],
        "TestCase" => &["Input", "Expected", "Text", "Uri", "Key", "Iv"],
        "Vulnerability" => &["Type", "Text", "Uri", "Mitigation"],
        "TestCategory" => &["Name", "Description"],
        _ => return None,
    })
}

/// The declared type of one helper-record field, used as an argument hint.
pub fn record_field_type(record: &str, field: &str) -> GoType {
    match (record, field) {
        ("KeySize", _) => GoType::Int,
        ("TestCase", "Input" | "Expected" | "Key" | "Iv") => GoType::bytes(),
        _ => GoType::String,
    }
}

/// Fields every algorithm base shares through `BaseAlgorithm`, with their
/// types, keyed by the Pascal-cased field name.
fn base_algorithm_fields() -> Vec<(&'static str, GoType)> {
    vec![
        ("Name", GoType::String),
        ("Description", GoType::String),
        ("Inventor", GoType::String),
        ("Year", GoType::Int),
        ("Category", GoType::named("CategoryType")),
        ("SubCategory", GoType::String),
        ("SecurityStatus", GoType::named("SecurityStatus")),
        ("Complexity", GoType::named("ComplexityType")),
        ("Country", GoType::named("CountryCode")),
        ("Documentation", GoType::slice(GoType::named("LinkItem"))),
        ("References", GoType::slice(GoType::named("LinkItem"))),
        (
            "KnownVulnerabilities",
            GoType::slice(GoType::named("Vulnerability")),
        ),
        ("Tests", GoType::slice(GoType::named("TestCase"))),
    ]
}

/// Extra fields each concrete base adds on top of `BaseAlgorithm`.
fn concrete_base_fields(base: &str) -> Vec<(&'static str, GoType)> {
    let key_sizes = || GoType::slice(GoType::named("KeySize"));
    match base {
        "BlockCipherAlgorithm" => vec![
            ("SupportedKeySizes", key_sizes()),
            ("SupportedBlockSizes", key_sizes()),
        ],
        "StreamCipherAlgorithm" => vec![
            ("SupportedKeySizes", key_sizes()),
            ("SupportedNonceSizes", key_sizes()),
        ],
        "HashFunctionAlgorithm" | "KdfAlgorithm" => vec![("SupportedOutputSizes", key_sizes())],
        "AsymmetricAlgorithm" => vec![("SupportedKeySizes", key_sizes())],
        "MacAlgorithm" => vec![("SupportedMacSizes", key_sizes())],
        "AeadAlgorithm" => vec![
            ("SupportedTagSizes", key_sizes()),
            ("SupportedNonceSizes", key_sizes()),
        ],
        "ChecksumAlgorithm" => vec![("ChecksumSize", GoType::Int)],
        _ => vec![],
    }
}

fn instance_base_fields(base: &str) -> Vec<(&'static str, GoType)> {
    match base {
        "IAlgorithmInstance" => vec![
            ("Algorithm", GoType::Interface),
            ("InputBuffer", GoType::bytes()),
            ("IsInverse", GoType::Bool),
        ],
        "IBlockCipherInstance" => vec![("Key", GoType::bytes()), ("BlockSize", GoType::Int)],
        "IStreamCipherInstance" => vec![("Key", GoType::bytes()), ("Iv", GoType::bytes())],
        "IHashFunctionInstance" => vec![("OutputSize", GoType::Int)],
        _ => vec![],
    }
}

/// Collapses alternate source spellings onto the framework field they mean.
pub fn canonical_base_field(pascal_name: &str) -> &str {
    match pascal_name {
        "ComplexityType" => "Complexity",
        "Vulnerabilities" => "KnownVulnerabilities",
        other => other,
    }
}

/// The type a field of the given (source-spelled) name has on the framework
/// bases, if it is a framework field at all.
pub fn base_field_type(field: &str) -> Option<GoType> {
    let pascal_name = canonical_base_field(&pascal(field)).to_string();
    for (name, ty) in base_algorithm_fields() {
        if name == pascal_name {
            return Some(ty);
        }
    }
    for base in CONCRETE_BASES {
        for (name, ty) in concrete_base_fields(base) {
            if name == pascal_name {
                return Some(ty);
            }
        }
    }
    for base in INSTANCE_BASES {
        for (name, ty) in instance_base_fields(base) {
            if name == pascal_name {
                return Some(ty);
            }
        }
    }
    None
}

/// Whether the Pascal-cased field is inherited when embedding `base`, so a
/// derived struct must not re-declare it.
pub fn base_has_field(base: &str, pascal_name: &str) -> bool {
    let pascal_name = canonical_base_field(pascal_name);
    if is_instance_base(base) {
        let mapped = map_base_class(base).unwrap_or(base);
        if instance_base_fields(mapped)
            .iter()
            .any(|(name, _)| *name == pascal_name)
        {
            return true;
        }
        // Every instance base promotes the IAlgorithmInstance fields.
        return mapped != "IAlgorithmInstance"
            && instance_base_fields("IAlgorithmInstance")
                .iter()
                .any(|(name, _)| *name == pascal_name);
    }
    let mapped = map_base_class(base).unwrap_or(base);
    if base_algorithm_fields()
        .iter()
        .any(|(name, _)| *name == pascal_name)
    {
        return true;
    }
    concrete_base_fields(mapped)
        .iter()
        .any(|(name, _)| *name == pascal_name)
}

fn struct_decl(
    name: &str,
    doc: &str,
    embedded: Option<&str>,
    fields: Vec<(&str, GoType)>,
    add_comments: bool,
) -> GoDecl {
    let mut all = Vec::with_capacity(fields.len() + 1);
    if let Some(base) = embedded {
        all.push(GoField::embedded(base));
    }
    for (field, ty) in fields {
        all.push(GoField::new(field, ty));
    }
    GoDecl::Struct {
        name: name.to_string(),
        doc: add_comments.then(|| doc.to_string()),
        fields: all,
    }
}

fn record_decl(name: &str, add_comments: bool) -> GoDecl {
    let (doc, fields): (&str, Vec<GoField>) = match name {
        "KeySize" => (
            "KeySize describes a supported size range in bytes.",
            vec![
                GoField::new("MinSize", GoType::Int),
                GoField::new("MaxSize", GoType::Int),
                GoField::new("Step", GoType::Int),
            ],
        ),
        "LinkItem" => (
            "LinkItem points at external documentation.",
            vec![
                GoField::new("Text", GoType::String),
                GoField::new("Uri", GoType::String),
            ],
        ),
        "TestCase" => (
            "TestCase is one known-answer vector for an algorithm.",
            vec![
                GoField::new("Input", GoType::bytes()),
                GoField::new("Expected", GoType::bytes()),
                GoField::new("Text", GoType::String),
                GoField::new("Uri", GoType::String),
                GoField::new("Key", GoType::bytes()),
                GoField::new("Iv", GoType::bytes()),
            ],
        ),
        "Vulnerability" => (
            "Vulnerability records a known weakness and its mitigation.",
            vec![
                GoField::new("Type", GoType::String),
                GoField::new("Text", GoType::String),
                GoField::new("Uri", GoType::String),
                GoField::new("Mitigation", GoType::String),
            ],
        ),
        "TestCategory" => (
            "TestCategory groups test vectors by purpose.",
            vec![
                GoField::new("Name", GoType::String),
                GoField::new("Description", GoType::String),
            ],
        ),
        other => (other, Vec::new()),
    };
    GoDecl::Struct {
        name: name.to_string(),
        doc: add_comments.then(|| doc.to_string()),
        fields,
    }
}

impl Transformer {
    /// Records that lowered code referenced a framework base.
    pub(crate) fn touch_framework(&mut self, name: &str) {
        self.ctx.framework_classes.insert(name.to_string());
    }

    pub(crate) fn touch_helper_record(&mut self, name: &str) {
        self.ctx.helper_classes.insert(name.to_string());
    }

    pub(crate) fn touch_enum(&mut self, name: &str) {
        self.ctx.enums_used.insert(name.to_string());
    }

    /// Records a helper function reference and returns its name for call
    /// sites.
    pub(crate) fn touch_helper<'n>(&mut self, name: &'n str) -> &'n str {
        self.ctx.framework_functions.insert(name.to_string());
        name
    }

    /// Emits every stub the transformation touched, transitively closed, in
    /// fixed order: enums, helper records, algorithm bases, instance bases,
    /// the framework singleton, then the helper-function block.
    pub(crate) fn stub_decls(&mut self) -> Vec<GoDecl> {
        let add_comments = self.options.add_comments;

        // Close over the base hierarchy: any algorithm base forces
        // BaseAlgorithm, which forces every enum and helper record.
        let classes: Vec<String> = self.ctx.framework_classes.iter().cloned().collect();
        let mut needs_base_algorithm = false;
        let mut needs_algorithm_instance = false;
        for class in &classes {
            if CONCRETE_BASES.contains(&class.as_str()) || class == "BaseAlgorithm" {
                needs_base_algorithm = true;
            }
            if is_instance_base(class) {
                needs_algorithm_instance = true;
            }
        }
        if needs_base_algorithm {
            for record in HELPER_RECORDS {
                self.ctx.helper_classes.insert((*record).to_string());
            }
            for def in enums::ENUMS {
                self.ctx.enums_used.insert(def.name.to_string());
            }
        }

        let mut decls = Vec::new();

        for def in enums::ENUMS {
            if self.ctx.enums_used.contains(def.name) {
                decls.extend(enums::enum_decls(def, add_comments));
            }
        }

        for record in HELPER_RECORDS {
            if self.ctx.helper_classes.contains(*record) {
                decls.push(record_decl(record, add_comments));
            }
        }

        if needs_base_algorithm {
            decls.push(struct_decl(
                "BaseAlgorithm",
                "BaseAlgorithm carries the metadata shared by every algorithm.",
                None,
                base_algorithm_fields(),
                add_comments,
            ));
            for base in CONCRETE_BASES {
                if self.ctx.framework_classes.contains(*base) {
                    decls.push(struct_decl(
                        base,
                        &format!("{base} is the base record for this algorithm family."),
                        Some("BaseAlgorithm"),
                        concrete_base_fields(base),
                        add_comments,
                    ));
                }
            }
        }

        if needs_algorithm_instance {
            decls.push(struct_decl(
                "IAlgorithmInstance",
                "IAlgorithmInstance holds the state shared by running instances.",
                None,
                instance_base_fields("IAlgorithmInstance"),
                add_comments,
            ));
            for base in &INSTANCE_BASES[1..] {
                if self.ctx.framework_classes.contains(*base) {
                    decls.push(struct_decl(
                        base,
                        &format!("{base} extends IAlgorithmInstance for its family."),
                        Some("IAlgorithmInstance"),
                        instance_base_fields(base),
                        add_comments,
                    ));
                }
            }
        }

        if self.ctx.framework_functions.contains("RegisterAlgorithm")
            || self.ctx.framework_functions.contains("AlgorithmFramework")
        {
            decls.extend(self.singleton_decls());
        }

        let selected = self.ctx.framework_functions.clone();
        for helper in helpers::resolve(&selected, self.options.use_crypto) {
            for import in helper.imports {
                self.ctx.import(import);
            }
            decls.push(GoDecl::Verbatim(helper.source.to_string()));
        }

        decls
    }

    fn singleton_decls(&mut self) -> Vec<GoDecl> {
        let add_comments = self.options.add_comments;
        // Truthiness checks against the singleton must compare with nil.
        self.ctx.register_module_var(
            "algorithmFramework",
            GoType::pointer(GoType::named("AlgorithmFramework")),
        );
        vec![
            GoDecl::Func {
                name: "RegisterAlgorithm".to_string(),
                doc: add_comments
                    .then(|| "RegisterAlgorithm records an algorithm with the registry.".into()),
                params: vec![GoParam::new("algorithm", GoType::Interface)],
                results: vec![],
                body: vec![],
            },
            GoDecl::Struct {
                name: "AlgorithmFramework".to_string(),
                doc: add_comments
                    .then(|| "AlgorithmFramework is the process-wide algorithm registry.".into()),
                fields: vec![],
            },
            GoDecl::Method {
                recv_name: "f".to_string(),
                recv_type: "AlgorithmFramework".to_string(),
                name: "Find".to_string(),
                doc: add_comments.then(|| "Find looks an algorithm up by name.".into()),
                params: vec![GoParam::new("name", GoType::String)],
                results: vec![GoType::Interface],
                body: vec![GoStmt::Return(Some(GoExpr::Nil))],
            },
            GoDecl::Var {
                name: "algorithmFramework".to_string(),
                doc: None,
                ty: Some(GoType::pointer(GoType::named("AlgorithmFramework"))),
                value: None,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{base_field_type, base_has_field, map_base_class, record_fields};
    use crate::Transformer;
    use ingot_go::GoType;

    #[test]
    fn test_base_class_mapping() {
        assert_eq!(
            map_base_class("BlockCipherAlgorithm"),
            Some("BlockCipherAlgorithm")
        );
        assert_eq!(map_base_class("Algorithm"), Some("BaseAlgorithm"));
        assert_eq!(map_base_class("PaddingAlgorithm"), Some("BaseAlgorithm"));
        assert_eq!(map_base_class("IMacInstance"), Some("IAlgorithmInstance"));
        assert_eq!(
            map_base_class("IBlockCipherInstance"),
            Some("IBlockCipherInstance")
        );
        assert_eq!(map_base_class("SomethingElse"), None);
    }

    #[test]
    fn test_base_fields_are_inherited() {
        assert!(base_has_field("BlockCipherAlgorithm", "Name"));
        assert!(base_has_field("BlockCipherAlgorithm", "SupportedKeySizes"));
        assert!(!base_has_field("HashFunctionAlgorithm", "SupportedKeySizes"));
        assert!(base_has_field("IBlockCipherInstance", "Algorithm"));
        assert!(base_has_field("IBlockCipherInstance", "Key"));
    }

    #[test]
    fn test_base_field_types() {
        assert_eq!(base_field_type("tests"), Some(GoType::slice(GoType::named("TestCase"))));
        assert_eq!(base_field_type("name"), Some(GoType::String));
        assert_eq!(base_field_type("myField"), None);
    }

    #[test]
    fn test_record_positional_maps() {
        assert_eq!(
            record_fields("KeySize"),
            Some(["MinSize", "MaxSize", "Step"].as_slice())
        );
        assert_eq!(
            record_fields("TestCase"),
            Some(["Input", "Expected", "Text", "Uri", "Key", "Iv"].as_slice())
        );
    }

    #[test]
    fn test_selecting_block_base_forces_full_suite() {
        let mut transformer = Transformer::default();
        transformer.touch_framework("BlockCipherAlgorithm");
        let decls = transformer.stub_decls();
        let names: Vec<String> = decls
            .iter()
            .filter_map(|decl| decl.name().map(str::to_string))
            .collect();
        assert!(names.contains(&"CategoryType".to_string()));
        assert!(names.contains(&"SecurityStatus".to_string()));
        assert!(names.contains(&"ComplexityType".to_string()));
        assert!(names.contains(&"CountryCode".to_string()));
        assert!(names.contains(&"KeySize".to_string()));
        assert!(names.contains(&"TestCase".to_string()));
        assert!(names.contains(&"BaseAlgorithm".to_string()));
        assert!(names.contains(&"BlockCipherAlgorithm".to_string()));
    }
}
