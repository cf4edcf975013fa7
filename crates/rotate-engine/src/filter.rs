//! Include/exclude filtering of entry names

use regex::Regex;

use crate::EngineError;

/// Outcome of filtering one entry name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Entry takes part in rotation
    Accepted,

    /// Entry matched an exclude pattern
    Excluded,

    /// Include patterns are configured and none matched
    NotIncluded,
}

/// Shell-style glob filter applied to file names
///
/// Exclude patterns are evaluated first and win over include patterns.
///
/// # Examples
///
/// ```
/// use rotate_engine::{FilenameFilter, FilterVerdict};
///
/// let filter = FilenameFilter::new(&["*2014*".to_string()], &["*2014-01*".to_string()]).unwrap();
/// assert_eq!(filter.check("2014-06-30"), FilterVerdict::Accepted);
/// assert_eq!(filter.check("2014-01-05"), FilterVerdict::Excluded);
/// assert_eq!(filter.check("2013-12-31"), FilterVerdict::NotIncluded);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilenameFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl FilenameFilter {
    /// Compile include and exclude globs
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, EngineError> {
        Ok(Self {
            include: include.iter().map(|p| compile_glob(p)).collect::<Result<_, _>>()?,
            exclude: exclude.iter().map(|p| compile_glob(p)).collect::<Result<_, _>>()?,
        })
    }

    /// Decide whether `name` takes part in rotation
    pub fn check(&self, name: &str) -> FilterVerdict {
        if self.exclude.iter().any(|p| p.is_match(name)) {
            FilterVerdict::Excluded
        } else if !self.include.is_empty() && !self.include.iter().any(|p| p.is_match(name)) {
            FilterVerdict::NotIncluded
        } else {
            FilterVerdict::Accepted
        }
    }

    /// Shorthand for `check(name) == FilterVerdict::Accepted`
    pub fn accepts(&self, name: &str) -> bool {
        self.check(name) == FilterVerdict::Accepted
    }
}

fn compile_glob(pattern: &str) -> Result<Regex, EngineError> {
    Regex::new(&glob_to_regex(pattern))
        .map_err(|e| EngineError::InvalidGlob(format!("{}: {}", pattern, e)))
}

/// Translate an `fnmatch` glob into an anchored regular expression
///
/// Supports `*`, `?`, `[seq]` and `[!seq]`. An unterminated `[` matches
/// itself literally.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from(r"(?s)\A");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    let mut body: String = chars[i + 1..end].iter().collect();
                    let negated = body.starts_with('!');
                    if negated {
                        body.remove(0);
                    }
                    out.push('[');
                    if negated {
                        out.push('^');
                    }
                    for c in body.chars() {
                        match c {
                            '\\' | '[' | ']' | '^' | '&' | '~' => {
                                out.push('\\');
                                out.push(c);
                            }
                            _ => out.push(c),
                        }
                    }
                    out.push(']');
                    i = end;
                }
                None => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out.push_str(r"\z");
    out
}

/// Index of the `]` closing the class opened at `start`
///
/// A `]` right after `[` or `[!` is part of the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globs(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = FilenameFilter::default();
        assert!(filter.accepts("2014-06-30"));
        assert!(filter.accepts("anything"));
    }

    #[test]
    fn test_include_prefix() {
        let filter = FilenameFilter::new(&globs(&["2014-*"]), &[]).unwrap();
        assert!(filter.accepts("2014-06-30@20:03"));
        assert_eq!(filter.check("2013-10-10@20:07"), FilterVerdict::NotIncluded);
    }

    #[test]
    fn test_exclude_wins() {
        let filter = FilenameFilter::new(&globs(&["*2014*"]), &globs(&["*2014-01*"])).unwrap();
        assert_eq!(filter.check("db-2014-01-15.sql"), FilterVerdict::Excluded);
        assert!(filter.accepts("db-2014-02-15.sql"));
    }

    #[test]
    fn test_whole_name_match() {
        let filter = FilenameFilter::new(&globs(&["*.tar.gz"]), &[]).unwrap();
        assert!(filter.accepts("laptop-2014-06-30.tar.gz"));
        assert!(!filter.accepts("laptop-2014-06-30.tar.gz.partial"));
        assert!(!filter.accepts("laptop-2014-06-30Xtar.gz"));
    }

    #[test]
    fn test_single_char_and_classes() {
        let filter = FilenameFilter::new(&globs(&["db?-[0-9]*"]), &globs(&["*[!0-9]"])).unwrap();
        assert!(filter.accepts("db1-2014-06-30"));
        assert_eq!(filter.check("db1-2014-06-30.gz"), FilterVerdict::Excluded);
        assert_eq!(filter.check("db12-2014-06-30"), FilterVerdict::NotIncluded);
    }

    #[test]
    fn test_unterminated_class_is_literal() {
        assert_eq!(glob_to_regex("a["), r"(?s)\Aa\[\z");
        let filter = FilenameFilter::new(&globs(&["[backup"]), &[]).unwrap();
        assert!(filter.accepts("[backup"));
    }

    #[test]
    fn test_closing_bracket_first_in_class() {
        let filter = FilenameFilter::new(&globs(&["[]x]*"]), &[]).unwrap();
        assert!(filter.accepts("]2014"));
        assert!(filter.accepts("x2014"));
        assert!(!filter.accepts("y2014"));
    }
}
