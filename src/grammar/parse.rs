use log::warn;

use super::{grammar::GrammarBuilder, Grammar, GrammarError};

impl Grammar {
    /// Parses a grammar in one of two layouts.
    ///
    /// Arrow layout, alternatives separated by `|`:
    ///
    /// ```text
    /// S -> a S b | e
    ///   | c
    /// ```
    ///
    /// Counted layout: a line holding the number of production lines, then
    /// that many lines whose alternatives are separated by whitespace:
    ///
    /// ```text
    /// 1
    /// S -> aSb e
    /// ```
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        let mut lines = grammar
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
            .peekable();

        let counted = match lines.peek() {
            Some((_, line)) => line.trim().chars().all(|c| c.is_ascii_digit()),
            None => return Err(GrammarError::NoProductions),
        };

        let mut b = GrammarBuilder::new();
        if counted {
            let (count_line, count) = lines.next().unwrap_or_default();
            let expected: usize = count
                .trim()
                .parse()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| GrammarError::InvalidCount {
                    line: count_line,
                    found: count.trim().to_string(),
                })?;

            let mut read = 0;
            for (i, line) in lines.take(expected) {
                let (head, rights) = split_head(i, line)?;
                let alternatives: Vec<&str> = rights.split_whitespace().collect();
                if alternatives.is_empty() {
                    return Err(GrammarError::NoAlternatives { line: i });
                }
                for alternative in alternatives {
                    match b.add_production(head, alternative) {
                        Ok(_) => {}
                        Err(GrammarError::EmptyBody(_)) => {
                            warn!(
                                "line {}: skipping empty alternative {} -> '{}'",
                                i, head, alternative
                            );
                        }
                        Err(e) => return Err(e),
                    }
                }
                read += 1;
            }
            if read < expected {
                warn!("expected {} production lines, found {}", expected, read);
            }
        } else {
            let mut previous_left: Option<char> = None;
            for (i, line) in lines {
                let (head, rights) = if line.contains("->") {
                    split_head(i, line)?
                } else if let Some(rest) = line.trim().strip_prefix('|') {
                    match previous_left {
                        Some(head) => (head, rest),
                        None => return Err(GrammarError::MissingLeftSide { line: i }),
                    }
                } else {
                    return Err(GrammarError::MissingLeftSide { line: i });
                };
                previous_left = Some(head);

                for right in rights.split('|') {
                    if right.trim().is_empty() {
                        return Err(GrammarError::NoAlternatives { line: i });
                    }
                    b.add_production(head, right)?;
                }
            }
        }

        b.build()
    }
}

fn split_head(line_number: usize, line: &str) -> Result<(char, &str), GrammarError> {
    let parts: Vec<&str> = line.split("->").collect();
    if parts.len() > 2 {
        return Err(GrammarError::TooManyArrows { line: line_number });
    }
    if parts.len() < 2 {
        return Err(GrammarError::MissingLeftSide { line: line_number });
    }

    let left = parts[0].trim();
    let mut chars = left.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(GrammarError::MissingLeftSide { line: line_number }),
        (Some(c), None) if c.is_ascii_uppercase() => Ok((c, parts[1])),
        _ => Err(GrammarError::InvalidHead {
            line: line_number,
            found: left.to_string(),
        }),
    }
}
