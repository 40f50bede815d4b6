//! Static language tables for the translation chain.
//!
//! Users type language names ("French") or short codes ("fr"); candidate
//! models each want their own encoding of the same information. Everything
//! here is a fixed lookup, no allocation beyond the returned `String`s.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Language name (lowercase) to ISO 639-1 code.
static NAME_TO_CODE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("english", "en"),
        ("french", "fr"),
        ("spanish", "es"),
        ("german", "de"),
        ("italian", "it"),
        ("portuguese", "pt"),
        ("dutch", "nl"),
        ("russian", "ru"),
        ("chinese", "zh"),
        ("japanese", "ja"),
        ("korean", "ko"),
        ("arabic", "ar"),
        ("turkish", "tr"),
        ("polish", "pl"),
        ("swedish", "sv"),
        ("ukrainian", "uk"),
        ("greek", "el"),
        ("hebrew", "he"),
        ("czech", "cs"),
        ("romanian", "ro"),
        ("vietnamese", "vi"),
        ("thai", "th"),
        ("indonesian", "id"),
        ("finnish", "fi"),
        ("danish", "da"),
        ("hungarian", "hu"),
        ("norwegian", "no"),
        ("hindi", "hi"),
        ("telugu", "te"),
        ("tamil", "ta"),
        ("bengali", "bn"),
        ("urdu", "ur"),
        ("marathi", "mr"),
        ("gujarati", "gu"),
        ("kannada", "kn"),
        ("malayalam", "ml"),
        ("punjabi", "pa"),
        ("nepali", "ne"),
        ("sinhala", "si"),
    ])
});

/// Codes that get the specialized lower-resource handling: an override table
/// lookup first, then a multilingual model, before the general backups.
const SPECIALIZED: &[&str] = &[
    "hi", "te", "ta", "bn", "ur", "mr", "gu", "kn", "ml", "pa", "ne", "si",
];

/// mBART-50 language tags. The published model covers exactly this set;
/// codes outside it make an mBART attempt fail over to the next candidate.
static MBART_TAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("af", "af_ZA"),
        ("ar", "ar_AR"),
        ("az", "az_AZ"),
        ("bn", "bn_IN"),
        ("cs", "cs_CZ"),
        ("de", "de_DE"),
        ("en", "en_XX"),
        ("es", "es_XX"),
        ("et", "et_EE"),
        ("fa", "fa_IR"),
        ("fi", "fi_FI"),
        ("fr", "fr_XX"),
        ("gl", "gl_ES"),
        ("gu", "gu_IN"),
        ("he", "he_IL"),
        ("hi", "hi_IN"),
        ("hr", "hr_HR"),
        ("id", "id_ID"),
        ("it", "it_IT"),
        ("ja", "ja_XX"),
        ("ka", "ka_GE"),
        ("kk", "kk_KZ"),
        ("km", "km_KH"),
        ("ko", "ko_KR"),
        ("lt", "lt_LT"),
        ("lv", "lv_LV"),
        ("mk", "mk_MK"),
        ("ml", "ml_IN"),
        ("mn", "mn_MN"),
        ("mr", "mr_IN"),
        ("my", "my_MM"),
        ("ne", "ne_NP"),
        ("nl", "nl_XX"),
        ("pl", "pl_PL"),
        ("ps", "ps_AF"),
        ("pt", "pt_XX"),
        ("ro", "ro_RO"),
        ("ru", "ru_RU"),
        ("si", "si_LK"),
        ("sl", "sl_SI"),
        ("sv", "sv_SE"),
        ("sw", "sw_KE"),
        ("ta", "ta_IN"),
        ("te", "te_IN"),
        ("th", "th_TH"),
        ("tl", "tl_XX"),
        ("tr", "tr_TR"),
        ("uk", "uk_UA"),
        ("ur", "ur_PK"),
        ("vi", "vi_VN"),
        ("xh", "xh_ZA"),
        ("zh", "zh_CN"),
    ])
});

/// Normalize a user-supplied language identifier to a short code.
///
/// Accepts full names and known two-letter codes, case-insensitively.
/// Anything unrecognized defaults to English with a logged warning, keeping
/// the translation path total.
pub fn normalize(identifier: &str) -> String {
    let needle = identifier.trim().to_lowercase();

    if needle.len() == 2 && NAME_TO_CODE.values().any(|code| *code == needle) {
        return needle;
    }
    if let Some(code) = NAME_TO_CODE.get(needle.as_str()) {
        return (*code).to_string();
    }

    tracing::warn!(language = %identifier, "unrecognized language identifier, defaulting to English");
    "en".to_string()
}

/// Whether a code gets the specialized lower-resource handling.
pub fn is_specialized(code: &str) -> bool {
    SPECIALIZED.contains(&code)
}

/// The mBART-50 tag for a code, if the model covers it.
pub fn mbart_tag(code: &str) -> Option<&'static str> {
    MBART_TAGS.get(code).copied()
}
