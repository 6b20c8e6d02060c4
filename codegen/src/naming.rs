//! Deterministic identifier derivation.
//!
//! A command's identifier is the title-cased concatenation of every segment
//! on its path: `server start` becomes `ServerStart`. Method names snake-case
//! each segment on its own and join them with `_`, so segment boundaries
//! survive one-letter and all-caps names (`a b` is `a_b`, not `ab`).
//!
//! Every generated name passes through [`rust_identifier`], which turns
//! keywords into raw identifiers and prefixes a leading digit.

/// Title-cases one name segment.
///
/// Runs of non-alphanumeric characters separate words; each word gets an
/// upper-case first letter and keeps the rest of its characters.
///
/// ```
/// use optionapi_codegen::naming::title_case;
///
/// assert_eq!(title_case("server"), "Server");
/// assert_eq!(title_case("dry-run"), "DryRun");
/// assert_eq!(title_case("connectTimeout"), "ConnectTimeout");
/// ```
pub fn title_case(segment: &str) -> String {
    segment
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Builds the type identifier for the command at `path`. An identifier
/// that would start with a digit gets a `_` prefix.
///
/// ```
/// use optionapi_codegen::naming::node_identifier;
///
/// assert_eq!(node_identifier(&["server", "start"]), "ServerStart");
/// assert_eq!(node_identifier(&["bar"]), "Bar");
/// assert_eq!(node_identifier(&["2fa"]), "_2fa");
/// ```
pub fn node_identifier<S: AsRef<str>>(path: &[S]) -> String {
    let identifier: String = path.iter().map(|s| title_case(s.as_ref())).collect();
    if starts_with_digit(&identifier) {
        format!("_{identifier}")
    } else {
        identifier
    }
}

/// Snake-cases each segment of `path` and joins them with `_`. The result
/// is not escaped; see [`method_name`].
///
/// ```
/// use optionapi_codegen::naming::path_snake_case;
///
/// assert_eq!(path_snake_case(&["server", "start"]), "server_start");
/// assert_eq!(path_snake_case(&["a", "BC"]), "a_bc");
/// assert_eq!(path_snake_case(&["HTTP", "getAll"]), "http_get_all");
/// ```
pub fn path_snake_case<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|s| snake_case(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Method name for the command at `path`, with `suffix` appended when given.
///
/// ```
/// use optionapi_codegen::naming::method_name;
///
/// assert_eq!(method_name(&["a", "b"], None), "a_b");
/// assert_eq!(method_name(&["move"], None), "r#move");
/// assert_eq!(method_name(&["2fa"], Some("hook_before")), "_2fa_hook_before");
/// ```
pub fn method_name<S: AsRef<str>>(path: &[S], suffix: Option<&str>) -> String {
    let base = path_snake_case(path);
    match suffix {
        Some(suffix) if base.is_empty() => rust_identifier(suffix),
        Some(suffix) => rust_identifier(&format!("{base}_{suffix}")),
        None => rust_identifier(&base),
    }
}

/// Converts an identifier to snake case.
///
/// ```
/// use optionapi_codegen::naming::snake_case;
///
/// assert_eq!(snake_case("ServerStart"), "server_start");
/// assert_eq!(snake_case("connectTimeout"), "connect_timeout");
/// assert_eq!(snake_case("HTTPProxy"), "http_proxy");
/// assert_eq!(snake_case("dry-run"), "dry_run");
/// ```
pub fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

// Keywords that cannot be written as raw identifiers.
const RESERVED: &[&str] = &["crate", "self", "super", "Self"];

/// Turns an option name into a usable Rust field name.
///
/// ```
/// use optionapi_codegen::naming::field_name;
///
/// assert_eq!(field_name("connectTimeout"), "connect_timeout");
/// assert_eq!(field_name("type"), "r#type");
/// assert_eq!(field_name("self"), "self_");
/// assert_eq!(field_name("2fa"), "_2fa");
/// ```
pub fn field_name(option_name: &str) -> String {
    rust_identifier(&snake_case(option_name))
}

/// Makes a snake-case name usable as a Rust identifier.
///
/// ```
/// use optionapi_codegen::naming::rust_identifier;
///
/// assert_eq!(rust_identifier("use"), "r#use");
/// assert_eq!(rust_identifier("super"), "super_");
/// assert_eq!(rust_identifier("3d"), "_3d");
/// assert_eq!(rust_identifier("status"), "status");
/// ```
pub fn rust_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{name}_")
    } else if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else if starts_with_digit(name) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

fn starts_with_digit(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_digit())
}
