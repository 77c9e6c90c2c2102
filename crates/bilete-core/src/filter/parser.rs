use crate::filter::criteria::{FilterCriteria, TypeFilter};
use crate::filter::FilterParseError;

const SELECTOR_PREFIXES: [&str; 3] = ["status:", "sent:", "type:"];

/// Parses a one-line filter query such as
/// `ana status:pending sent:not-sent type:"BAL + AFTER"`.
///
/// Tokens without a selector prefix are joined with single spaces into the
/// search term, as are tokens that open with a quote, so `"status:pending"`
/// searches for that text. A later selector of the same kind overrides an
/// earlier one.
pub fn parse_filter(input: &str) -> Result<FilterCriteria, FilterParseError> {
    let mut criteria = FilterCriteria::default();
    let mut text_terms = Vec::new();

    for token in tokenize(input)? {
        if token.literal {
            if !token.text.is_empty() {
                text_terms.push(token.text);
            }
            continue;
        }
        if let Some(raw) = token.text.strip_prefix("status:") {
            criteria.status = raw.parse()?;
        } else if let Some(raw) = token.text.strip_prefix("sent:") {
            criteria.sent = raw.parse()?;
        } else if let Some(raw) = token.text.strip_prefix("type:") {
            criteria.ticket_type = raw.parse::<TypeFilter>()?;
        } else {
            text_terms.push(token.text);
        }
    }

    criteria.search_term = text_terms.join(" ");
    Ok(criteria)
}

/// True when `word` would be read as a selector unless quoted.
pub(crate) fn looks_like_selector(word: &str) -> bool {
    SELECTOR_PREFIXES
        .iter()
        .any(|prefix| word.starts_with(prefix))
}

struct Token {
    text: String,
    /// Opened with a quote, so never a selector.
    literal: bool,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut literal = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                if current.is_empty() && !quoted {
                    literal = true;
                }
                in_quotes = !in_quotes;
                quoted = true;
            }
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() || quoted {
                    tokens.push(Token {
                        text: std::mem::take(&mut current),
                        literal,
                    });
                }
                quoted = false;
                literal = false;
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(FilterParseError::UnterminatedQuote);
    }
    if !current.is_empty() || quoted {
        tokens.push(Token {
            text: current,
            literal,
        });
    }

    Ok(tokens)
}
