//! The framework enums and their normalization tables.
//!
//! Source trees spell enum members loosely (`INSECURE`, `BASIC`,
//! `SINGAPORE`, …); the generated Go code uses one canonical constant per
//! meaning. Both the constant lists and the spelling tables are fixed
//! contracts: transformed code references the constants by name.

use ingot_go::{GoDecl, GoExpr, GoType};

/// A generated string-based enum: `type Name string` plus a const block.
pub struct EnumDef {
    pub name: &'static str,
    pub doc: &'static str,
    /// (constant identifier, string value)
    pub constants: &'static [(&'static str, &'static str)],
}

pub const CATEGORY_TYPE: EnumDef = EnumDef {
    name: "CategoryType",
    doc: "CategoryType classifies an algorithm by its cryptographic role.",
    constants: &[
        ("CategoryBlock", "Block Cipher"),
        ("CategoryStream", "Stream Cipher"),
        ("CategoryHash", "Hash Function"),
        ("CategoryAsymmetric", "Asymmetric Cipher"),
        ("CategoryClassical", "Classical Cipher"),
        ("CategoryMAC", "Message Authentication"),
        ("CategoryKDF", "Key Derivation"),
        ("CategoryAEAD", "Authenticated Encryption"),
        ("CategoryChecksum", "Checksum"),
        ("CategoryCompression", "Compression"),
        ("CategoryEncoding", "Encoding"),
        ("CategoryErrorCorrection", "Error Correction"),
        ("CategoryPadding", "Padding Scheme"),
        ("CategoryMode", "Cipher Mode"),
        ("CategoryRandom", "Random Generation"),
        ("CategorySpecial", "Special Purpose"),
    ],
};

pub const SECURITY_STATUS: EnumDef = EnumDef {
    name: "SecurityStatus",
    doc: "SecurityStatus records the current cryptanalytic standing.",
    constants: &[
        ("SecuritySecure", "secure"),
        ("SecurityBroken", "broken"),
        ("SecurityDeprecated", "deprecated"),
        ("SecurityExperimental", "experimental"),
        ("SecurityEducational", "educational"),
    ],
};

pub const COMPLEXITY_TYPE: EnumDef = EnumDef {
    name: "ComplexityType",
    doc: "ComplexityType grades how hard an algorithm is to follow.",
    constants: &[
        ("ComplexityBeginner", "beginner"),
        ("ComplexityIntermediate", "intermediate"),
        ("ComplexityAdvanced", "advanced"),
        ("ComplexityExpert", "expert"),
    ],
};

pub const COUNTRY_CODE: EnumDef = EnumDef {
    name: "CountryCode",
    doc: "CountryCode names an algorithm's country of origin (ISO 3166-1).",
    constants: &[
        ("CountryUS", "US"),
        ("CountryGB", "GB"),
        ("CountryDE", "DE"),
        ("CountryFR", "FR"),
        ("CountryRU", "RU"),
        ("CountryCN", "CN"),
        ("CountryJP", "JP"),
        ("CountryKR", "KR"),
        ("CountryIL", "IL"),
        ("CountryBE", "BE"),
        ("CountrySG", "SG"),
        ("CountryCH", "CH"),
        ("CountryNL", "NL"),
        ("CountryAU", "AU"),
        ("CountryCA", "CA"),
        ("CountryUA", "UA"),
        ("CountryIT", "IT"),
        ("CountryES", "ES"),
        ("CountrySE", "SE"),
        ("CountryNO", "NO"),
        ("CountryFI", "FI"),
        ("CountryDK", "DK"),
        ("CountryAT", "AT"),
        ("CountryPL", "PL"),
        ("CountryIN", "IN"),
        ("CountryBR", "BR"),
        ("CountryIntl", "INTL"),
    ],
};

/// All enums in emission order.
pub const ENUMS: &[&EnumDef] = &[
    &CATEGORY_TYPE,
    &SECURITY_STATUS,
    &COMPLEXITY_TYPE,
    &COUNTRY_CODE,
];

/// Source spelling → canonical constant, per enum.
const CATEGORY_SPELLINGS: &[(&str, &str)] = &[
    ("BLOCK", "CategoryBlock"),
    ("STREAM", "CategoryStream"),
    ("HASH", "CategoryHash"),
    ("ASYMMETRIC", "CategoryAsymmetric"),
    ("CLASSICAL", "CategoryClassical"),
    ("CLASSICAL_CIPHER", "CategoryClassical"),
    ("MAC", "CategoryMAC"),
    ("KDF", "CategoryKDF"),
    ("AEAD", "CategoryAEAD"),
    ("CHECKSUM", "CategoryChecksum"),
    ("COMPRESSION", "CategoryCompression"),
    ("ENCODING", "CategoryEncoding"),
    ("ECC", "CategoryErrorCorrection"),
    ("ERROR_CORRECTION", "CategoryErrorCorrection"),
    ("PADDING", "CategoryPadding"),
    ("MODE", "CategoryMode"),
    ("CIPHER_MODE", "CategoryMode"),
    ("PRNG", "CategoryRandom"),
    ("RANDOM", "CategoryRandom"),
    ("SPECIAL", "CategorySpecial"),
];

const SECURITY_SPELLINGS: &[(&str, &str)] = &[
    ("SECURE", "SecuritySecure"),
    ("INSECURE", "SecurityBroken"),
    ("BROKEN", "SecurityBroken"),
    ("WEAK", "SecurityBroken"),
    ("DEPRECATED", "SecurityDeprecated"),
    ("OBSOLETE", "SecurityDeprecated"),
    ("EXPERIMENTAL", "SecurityExperimental"),
    ("EDUCATIONAL", "SecurityEducational"),
    ("EDU", "SecurityEducational"),
];

const COMPLEXITY_SPELLINGS: &[(&str, &str)] = &[
    ("BASIC", "ComplexityBeginner"),
    ("SIMPLE", "ComplexityBeginner"),
    ("LOW", "ComplexityBeginner"),
    ("BEGINNER", "ComplexityBeginner"),
    ("INTERMEDIATE", "ComplexityIntermediate"),
    ("MEDIUM", "ComplexityIntermediate"),
    ("ADVANCED", "ComplexityAdvanced"),
    ("HIGH", "ComplexityAdvanced"),
    ("EXPERT", "ComplexityExpert"),
    ("RESEARCH", "ComplexityExpert"),
];

const COUNTRY_SPELLINGS: &[(&str, &str)] = &[
    ("US", "CountryUS"),
    ("USA", "CountryUS"),
    ("UNITED_STATES", "CountryUS"),
    ("UK", "CountryGB"),
    ("GB", "CountryGB"),
    ("UNITED_KINGDOM", "CountryGB"),
    ("DE", "CountryDE"),
    ("GERMANY", "CountryDE"),
    ("FR", "CountryFR"),
    ("FRANCE", "CountryFR"),
    ("RU", "CountryRU"),
    ("RUSSIA", "CountryRU"),
    ("USSR", "CountryRU"),
    ("SOVIET_UNION", "CountryRU"),
    ("CN", "CountryCN"),
    ("CHINA", "CountryCN"),
    ("JP", "CountryJP"),
    ("JAPAN", "CountryJP"),
    ("KR", "CountryKR"),
    ("KOREA", "CountryKR"),
    ("SOUTH_KOREA", "CountryKR"),
    ("IL", "CountryIL"),
    ("ISRAEL", "CountryIL"),
    ("BE", "CountryBE"),
    ("BELGIUM", "CountryBE"),
    ("SG", "CountrySG"),
    ("SINGAPORE", "CountrySG"),
    ("CH", "CountryCH"),
    ("SWITZERLAND", "CountryCH"),
    ("NL", "CountryNL"),
    ("NETHERLANDS", "CountryNL"),
    ("AU", "CountryAU"),
    ("AUSTRALIA", "CountryAU"),
    ("CA", "CountryCA"),
    ("CANADA", "CountryCA"),
    ("UA", "CountryUA"),
    ("UKRAINE", "CountryUA"),
    ("IT", "CountryIT"),
    ("ITALY", "CountryIT"),
    ("ES", "CountryES"),
    ("SPAIN", "CountryES"),
    ("SE", "CountrySE"),
    ("SWEDEN", "CountrySE"),
    ("NO", "CountryNO"),
    ("NORWAY", "CountryNO"),
    ("FI", "CountryFI"),
    ("FINLAND", "CountryFI"),
    ("DK", "CountryDK"),
    ("DENMARK", "CountryDK"),
    ("AT", "CountryAT"),
    ("AUSTRIA", "CountryAT"),
    ("PL", "CountryPL"),
    ("POLAND", "CountryPL"),
    ("IN", "CountryIN"),
    ("INDIA", "CountryIN"),
    ("BR", "CountryBR"),
    ("BRAZIL", "CountryBR"),
    ("INTL", "CountryIntl"),
    ("INTERNATIONAL", "CountryIntl"),
    ("MULTI", "CountryIntl"),
    ("UNKNOWN", "CountryIntl"),
];

/// True when `name` spells one of the framework enums.
pub fn is_enum_name(name: &str) -> bool {
    matches!(
        name,
        "CategoryType" | "SecurityStatus" | "ComplexityType" | "CountryCode"
    )
}

/// Resolves an enum member spelling to its canonical constant identifier.
///
/// Unrecognized members fall back to the Pascal-cased member prefixed with
/// the enum's short name, so the reference still resolves to a unique
/// identifier (the constant will be missing, which surfaces as a compile
/// error downstream rather than silently-wrong metadata).
pub fn normalize_member(enum_name: &str, member: &str) -> Option<String> {
    let table: &[(&str, &str)] = match enum_name {
        "CategoryType" => CATEGORY_SPELLINGS,
        "SecurityStatus" => SECURITY_SPELLINGS,
        "ComplexityType" => COMPLEXITY_SPELLINGS,
        "CountryCode" => COUNTRY_SPELLINGS,
        _ => return None,
    };
    for (spelling, constant) in table {
        if *spelling == member {
            return Some((*constant).to_string());
        }
    }
    let short = enum_name.trim_end_matches("Type").trim_end_matches("Code");
    let short = match enum_name {
        "SecurityStatus" => "Security",
        "CountryCode" => "Country",
        _ => short,
    };
    Some(format!(
        "{short}{}",
        heck::AsUpperCamelCase(member.to_lowercase())
    ))
}

/// Emits `type Name string` plus the const block for one enum.
pub fn enum_decls(def: &EnumDef, add_comments: bool) -> Vec<GoDecl> {
    let type_def = GoDecl::TypeDef {
        name: def.name.to_string(),
        doc: add_comments.then(|| def.doc.to_string()),
        underlying: GoType::String,
    };
    let constants = GoDecl::ConstGroup {
        doc: None,
        entries: def
            .constants
            .iter()
            .map(|(name, value)| {
                (
                    (*name).to_string(),
                    Some(GoType::named(def.name)),
                    GoExpr::str(*value),
                )
            })
            .collect(),
    };
    vec![type_def, constants]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{enum_decls, normalize_member, SECURITY_STATUS};

    #[test]
    fn test_security_normalization() {
        assert_eq!(
            normalize_member("SecurityStatus", "INSECURE").as_deref(),
            Some("SecurityBroken")
        );
        assert_eq!(
            normalize_member("SecurityStatus", "SECURE").as_deref(),
            Some("SecuritySecure")
        );
    }

    #[test]
    fn test_complexity_aliases_collapse() {
        for spelling in ["BASIC", "SIMPLE", "LOW"] {
            assert_eq!(
                normalize_member("ComplexityType", spelling).as_deref(),
                Some("ComplexityBeginner")
            );
        }
    }

    #[test]
    fn test_country_names_map_to_iso() {
        assert_eq!(
            normalize_member("CountryCode", "SINGAPORE").as_deref(),
            Some("CountrySG")
        );
        assert_eq!(
            normalize_member("CountryCode", "UNITED_STATES").as_deref(),
            Some("CountryUS")
        );
    }

    #[test]
    fn test_unrecognized_member_gets_stable_fallback() {
        assert_eq!(
            normalize_member("CategoryType", "QUANTUM").as_deref(),
            Some("CategoryQuantum")
        );
    }

    #[test]
    fn test_enum_emission_shape() {
        let decls = enum_decls(&SECURITY_STATUS, true);
        assert_eq!(decls.len(), 2);
        let rendered = ingot_go::render_decl(&decls[1]);
        assert!(rendered.contains("SecuritySecure SecurityStatus = \"secure\""));
        assert!(rendered.contains("SecurityBroken SecurityStatus = \"broken\""));
    }
}
