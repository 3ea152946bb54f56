//! Grammar-to-extension mapping.
//!
//! Maps Atom grammar identifiers to file extensions for the exported notes.
//! Several grammars map to the same extension, and a few (like `Gemfile` or
//! `gitconfig`) are extensionless in their own ecosystems; those export with
//! the grammar name as the extension so the `slug__NNN.ext` filename pattern
//! holds and multiple notes with the same grammar never collide.

use std::collections::BTreeSet;

/// Static grammar-tag to file-extension table
pub const GRAMMAR_TO_EXTENSION: &[(&str, &str)] = &[
    ("source.c", "c"),
    ("source.cake", "cake"),
    ("source.clojure", "clj"),
    ("source.coffee", "coffee"),
    ("source.cpp", "cpp"),
    ("source.cs", "cs"),
    ("source.css", "css"),
    ("source.css.less", "less"),
    ("source.css.scss", "scss"),
    ("source.csx", "csx"),
    ("source.flow", "js"),
    ("source.gfm", "md"),
    ("source.git-config", "gitconfig"),
    ("source.go", "go"),
    ("source.java", "java"),
    ("source.java-properties", "properties"),
    ("source.js", "js"),
    ("source.js.rails source.js.jquery", "js"),
    ("source.json", "json"),
    ("source.litcoffee", "litcoffee"),
    ("source.makefile", "mk"),
    ("source.mod", "mod"),
    ("source.objc", "m"),
    ("source.objcpp", "mm"),
    ("source.perl", "pl"),
    ("source.perl6", "pl6"),
    ("source.plist", "plist"),
    ("source.python", "py"),
    ("source.regexp.python", "re"),
    ("source.ruby", "rb"),
    ("source.ruby.gemfile", "Gemfile"),
    ("source.ruby.rails", "rb"),
    ("source.ruby.rails.rjs", "rjs"),
    ("source.rust", "rs"),
    ("source.sass", "sass"),
    ("source.shell", "sh"),
    ("source.sql", "sql"),
    ("source.sql.ruby", "erbsql"),
    ("source.strings", "strings"),
    ("source.toml", "toml"),
    ("source.ts", "ts"),
    ("source.tsx", "tsx"),
    ("source.yaml", "yaml"),
    ("text.git-commit", "txt"),
    ("text.git-rebase", "txt"),
    ("text.html.basic", "html"),
    ("text.html.ejs", "ejs"),
    ("text.html.erb", "erb"),
    ("text.html.gohtml", "gohtml"),
    ("text.html.jsp", "jsp"),
    ("text.html.mustache", "mustache"),
    ("text.html.php", "php"),
    ("text.html.ruby", "erb"),
    ("text.plain", "txt"),
    ("text.plain.null-grammar", "txt"),
    ("text.null-grammar", "txt"),
    ("null-grammar", "txt"),
    ("text.python.console", "py"),
    ("text.python.traceback", "pytb"),
    ("text.shell-session", "sh"),
    ("text.xml", "xml"),
    ("text.xml.plist", "plist"),
    ("text.xml.xsl", "xsl"),
];

/// Look up the file extension for a grammar tag
pub fn extension_for(grammar: &str) -> Option<&'static str> {
    GRAMMAR_TO_EXTENSION
        .iter()
        .find(|(g, _)| *g == grammar)
        .map(|(_, ext)| *ext)
}

/// The set of extensions this tool knows how to emit.
///
/// Used to validate a requested fallback extension; sorted and deduplicated.
pub fn supported_extensions() -> BTreeSet<&'static str> {
    GRAMMAR_TO_EXTENSION.iter().map(|(_, ext)| *ext).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(extension_for("source.python"), Some("py"));
        assert_eq!(extension_for("text.html.basic"), Some("html"));
        assert_eq!(extension_for("source.unknown"), None);
    }

    #[test]
    fn test_many_to_one() {
        assert_eq!(extension_for("text.git-commit"), Some("txt"));
        assert_eq!(extension_for("text.plain"), Some("txt"));
        assert_eq!(extension_for("source.flow"), extension_for("source.js"));
    }

    #[test]
    fn test_supported_extensions_deduplicated() {
        let exts = supported_extensions();
        assert!(exts.contains("txt"));
        assert!(exts.contains("py"));
        assert!(exts.contains("Gemfile"));
        assert!(exts.len() < GRAMMAR_TO_EXTENSION.len());
    }

    #[test]
    fn test_table_has_no_duplicate_grammars() {
        let distinct: BTreeSet<_> = GRAMMAR_TO_EXTENSION.iter().map(|(g, _)| *g).collect();
        assert_eq!(distinct.len(), GRAMMAR_TO_EXTENSION.len());
    }
}
