//! Parser for list-literal cells such as `['Antifungal Cream', "Clotrimazole"]`.

use std::iter::Peekable;
use std::str::Chars;

/// Parse a bracketed list of quoted strings. Returns `None` for anything else.
///
/// Single and double quotes are accepted, backslash escapes are honored and a
/// trailing comma is allowed.
pub fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        skip_whitespace(&mut chars);
        let Some(&quote) = chars.peek() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return None;
        }
        chars.next();
        items.push(read_quoted(&mut chars, quote)?);

        skip_whitespace(&mut chars);
        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(_) => return None,
        }
    }

    Some(items)
}

/// Parse a list cell, falling back to a single-item list holding the raw text.
pub fn parse_list_cell(raw: &str) -> Vec<String> {
    match parse_list_literal(raw) {
        Some(items) => items,
        None if raw.trim().is_empty() => Vec::new(),
        None => {
            tracing::debug!("Unparseable list cell, keeping raw text: {:?}", raw);
            vec![raw.to_string()]
        }
    }
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Option<String> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                other => value.push(other),
            },
            c if c == quote => return Some(value),
            c => value.push(c),
        }
    }
    // Unterminated string.
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_lists() {
        assert_eq!(
            parse_list_literal("['Antifungal Cream', 'Fluconazole']").unwrap(),
            vec!["Antifungal Cream", "Fluconazole"]
        );
        assert_eq!(
            parse_list_literal(r#"  ["Low-sugar diet", 'Whole grains',]  "#).unwrap(),
            vec!["Low-sugar diet", "Whole grains"]
        );
        assert_eq!(parse_list_literal("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_parse_commas_and_escapes_inside_quotes() {
        assert_eq!(
            parse_list_literal(r"['Rest, fluids', 'Patient\'s choice']").unwrap(),
            vec!["Rest, fluids", "Patient's choice"]
        );
        assert_eq!(
            parse_list_literal(r#"["He said \"hi\""]"#).unwrap(),
            vec![r#"He said "hi""#]
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(parse_list_literal("Antifungal Cream").is_none());
        assert!(parse_list_literal("['unterminated]").is_none());
        assert!(parse_list_literal("[1, 2]").is_none());
        assert!(parse_list_literal("['a' 'b']").is_none());
    }

    #[test]
    fn test_cell_fallback() {
        assert_eq!(parse_list_cell("Rest and fluids"), vec!["Rest and fluids"]);
        assert_eq!(parse_list_cell("['A','B']"), vec!["A", "B"]);
        assert!(parse_list_cell("   ").is_empty());
    }
}
