//! Glob-like file pattern matching.
//!
//! Patterns route files to tools. Grammar:
//!
//! - `?` matches exactly one non-separator character
//! - `*` matches zero or more non-separator characters
//! - `**/` matches zero or more whole path segments
//! - `{a,b,c}` alternation (alternatives may use the tokens above; braces
//!   do not nest)
//!
//! Matching is case-insensitive and anchored as `^(.*/)?<pattern>$`, so a
//! bare filename pattern like `package.json` matches at any depth while a
//! path pattern like `ab/*.txt` still refuses to cross extra segments.
//!
//! A malformed pattern is a programming error in the tool catalog, so
//! compilation panics instead of surfacing a per-file error.

use regex::{Regex, RegexBuilder};

/// A compiled file-match pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile a glob-like pattern.
    ///
    /// # Panics
    ///
    /// Panics on nested or unbalanced braces, or any pattern that does not
    /// compile to a valid regex.
    pub fn compile(pattern: &str) -> Self {
        let body = translate(pattern);
        let anchored = format!("^(?:.*/)?{body}$");
        let regex = RegexBuilder::new(&anchored)
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|e| panic!("invalid file pattern {pattern:?}: {e}"));
        Self { regex }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compile a pattern list. One tool may carry several unrelated patterns.
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Vec<Pattern> {
    patterns.iter().map(|p| Pattern::compile(p.as_ref())).collect()
}

/// A path matches a pattern list if any entry matches.
pub fn match_any(path: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|p| p.is_match(path))
}

/// Translate the glob body to a regex fragment.
fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut in_brace = false;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') && chars.get(i + 2) == Some(&'/') => {
                out.push_str("(?:[^/]+/)*");
                i += 3;
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '{' => {
                if in_brace {
                    panic!("invalid file pattern {pattern:?}: nested braces");
                }
                in_brace = true;
                out.push_str("(?:");
            }
            '}' => {
                if !in_brace {
                    panic!("invalid file pattern {pattern:?}: unbalanced '}}'");
                }
                in_brace = false;
                out.push(')');
            }
            ',' if in_brace => out.push('|'),
            c => {
                if is_regex_meta(c) {
                    out.push('\\');
                }
                out.push(c);
            }
        }
        i += 1;
    }

    if in_brace {
        panic!("invalid file pattern {pattern:?}: unterminated brace");
    }

    out
}

fn is_regex_meta(c: char) -> bool {
    matches!(c, '.' | '-' | '+' | '(' | ')' | '|' | '[' | ']' | '^' | '$' | '\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        Pattern::compile(pattern).is_match(path)
    }

    #[test]
    fn brace_alternation() {
        assert!(matches("*.{txt,md}", "a.txt"));
        assert!(matches("*.{txt,md}", "a.md"));
        assert!(!matches("*.{txt,md}", "a.txtmd"));
        assert!(!matches("*.{txt,md}", "a.jpg"));
    }

    #[test]
    fn question_mark_is_single_char() {
        assert!(matches("ab?.txt", "abc.txt"));
        assert!(matches("ab?.txt", "abd.txt"));
        assert!(!matches("ab?.txt", "abcd.txt"));
        assert!(!matches("ab?.txt", "ab.txt"));
    }

    #[test]
    fn double_star_spans_segments() {
        assert!(matches("ab/**/*.txt", "ab/file.txt"));
        assert!(matches("ab/**/*.txt", "ab/dir/file.txt"));
        assert!(matches("ab/**/*.txt", "ab/dir/dir2/file.txt"));
        assert!(!matches("ab/**/*.txt", "ab.txt"));
    }

    #[test]
    fn single_star_stays_in_segment() {
        assert!(matches("ab/*.txt", "ab/file.txt"));
        assert!(!matches("ab/*.txt", "ab/dir/file.txt"));
    }

    #[test]
    fn bare_filename_matches_at_any_depth() {
        assert!(matches("package.json", "package.json"));
        assert!(matches("package.json", "some/nested/dir/package.json"));
        assert!(!matches("package.json", "package.json5"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(matches("*.md", "README.MD"));
        assert!(matches("Makefile", "makefile"));
    }

    #[test]
    fn empty_brace_alternative() {
        // The makefile matcher family relies on empty alternatives.
        assert!(matches("{GNU,G,}{Makefile,*.make}", "GNUMakefile"));
        assert!(matches("{GNU,G,}{Makefile,*.make}", "Makefile"));
        assert!(matches("{GNU,G,}{Makefile,*.make}", "rules.make"));
        assert!(!matches("{GNU,G,}{Makefile,*.make}", "Makefile.am"));
    }

    #[test]
    fn dots_are_literal() {
        assert!(!matches("*.env", "axenv"));
        assert!(matches("{*.env,env.*,env}", "env.production"));
    }

    #[test]
    fn match_any_is_logical_or() {
        let patterns = compile_all(&["*.yml", "*.yaml"]);
        assert!(match_any("ci.yml", &patterns));
        assert!(match_any("deep/dir/ci.yaml", &patterns));
        assert!(!match_any("ci.json", &patterns));
    }

    #[test]
    #[should_panic(expected = "nested braces")]
    fn nested_braces_panic() {
        Pattern::compile("*.{a,{b,c}}");
    }

    #[test]
    #[should_panic(expected = "unterminated brace")]
    fn unterminated_brace_panics() {
        Pattern::compile("*.{yml,yaml");
    }
}
