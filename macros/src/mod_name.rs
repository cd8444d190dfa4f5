use inflector::Inflector;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Converts a register or block name into a module name.
///
/// Names in upper case are lowered as is, mixed-case names are converted to
/// snake case. An underscore is prepended to reserved keywords.
pub fn mod_name(ident: &str) -> String {
    let mut name = if ident.chars().any(char::is_lowercase) {
        ident.to_snake_case()
    } else {
        ident.to_lowercase()
    };
    if KEYWORDS.contains(&name.as_str()) {
        name.insert(0, '_');
    }
    name
}
