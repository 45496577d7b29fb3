//! Class-name rules shared by the `workbench` runtime and its macros.
//!
//! The runtime resolves textual identifiers with these rules and the
//! `Model` derive builds class paths with them, so a namespaced model is
//! always registered under the path its own name resolves to.

/// Namespace separator used in class paths.
pub const SEPARATOR: &str = "::";

const fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Transforms `namespace/model_name` into `Namespace::ModelName`.
///
/// Every `/` becomes `::`; the first character of each word and the
/// character following each underscore are upper-cased, and those
/// underscores are dropped. Characters that are already upper-case are left
/// alone, so classified names without underscores pass through unchanged.
///
/// # Examples
///
/// ```
/// use workbench_naming::classify;
///
/// assert_eq!(classify("namespace/model_name"), "Namespace::ModelName");
/// assert_eq!(classify("Namespace::ModelName"), "Namespace::ModelName");
/// assert_eq!(classify("HTTPServer"), "HTTPServer");
/// ```
#[must_use]
pub fn classify(value: &str) -> String {
    let replaced = value.replace('/', SEPARATOR);
    let mut out = String::with_capacity(replaced.len());
    let mut prev_word = false;
    let mut iter = replaced.chars();
    while let Some(c) = iter.next() {
        if c == '_' {
            if let Some(next) = iter.next() {
                out.extend(next.to_uppercase());
                prev_word = is_word(next);
                continue;
            }
            out.push(c);
            break;
        }
        if prev_word == is_word(c) {
            out.push(c);
        } else {
            out.extend(c.to_uppercase());
        }
        prev_word = is_word(c);
    }
    out
}

/// Joins a namespace and a type name into a class path.
///
/// The namespace may use `/` or `::` between segments. Segments starting
/// with an upper-case letter are kept literally and the rest are
/// [classified](classify), matching how names are looked up.
///
/// ```
/// use workbench_naming::class_path_in;
///
/// assert_eq!(class_path_in("billing/line_items", "Entry"), "Billing::LineItems::Entry");
/// assert_eq!(class_path_in("Billing::HTTPGateway", "Charge"), "Billing::HTTPGateway::Charge");
/// ```
#[must_use]
pub fn class_path_in(namespace: &str, name: &str) -> String {
    namespace
        .split(['/', ':'])
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.starts_with(|c: char| c.is_ascii_uppercase()) {
                segment.to_owned()
            } else {
                classify(segment)
            }
        })
        .chain(std::iter::once(name.to_owned()))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Splits `<entity>_defaults` into its entity name.
///
/// Returns `None` for names that do not follow the convention, including a
/// bare `_defaults`.
#[must_use]
pub fn entity_name(fn_name: &str) -> Option<&str> {
    fn_name
        .strip_suffix("_defaults")
        .filter(|entity| !entity.is_empty())
}
