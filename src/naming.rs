//! Naming convention bridging input filenames and expected output artifacts.
//!
//! The toolchain underscores the numeric suffix in its own output names
//! (`input5.txt` produces `input_5.s`) but leaves every other name alone.
//! Both branches of that asymmetric rule are preserved here exactly.

use std::path::Path;

/// Derive the canonical base name used to locate a case's expected outputs.
///
/// Strips the file extension; if the remaining stem is `input` followed by
/// nothing but decimal digits, the result is `input_<digits>`. Any other
/// stem (missing prefix, non-numeric suffix, bare `input`) passes through
/// unchanged.
pub fn base_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    if let Some(digits) = stem.strip_prefix("input") {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return format!("input_{digits}");
        }
    }

    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_suffix_gets_underscored() {
        assert_eq!(base_name("input5.txt"), "input_5");
        assert_eq!(base_name("input14.txt"), "input_14");
        assert_eq!(base_name("input007.txt"), "input_007");
    }

    #[test]
    fn non_numeric_suffix_passes_through() {
        assert_eq!(base_name("inputFoo.txt"), "inputFoo");
        assert_eq!(base_name("input5a.txt"), "input5a");
    }

    #[test]
    fn bare_input_stem_passes_through() {
        assert_eq!(base_name("input.txt"), "input");
    }

    #[test]
    fn missing_prefix_passes_through() {
        assert_eq!(base_name("program3.txt"), "program3");
        assert_eq!(base_name("readme.md"), "readme");
    }

    #[test]
    fn no_extension_uses_whole_name_as_stem() {
        assert_eq!(base_name("input9"), "input_9");
        assert_eq!(base_name("notes"), "notes");
    }
}
