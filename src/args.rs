//! Splitting one input line into an argument vector, honoring double quotes.

use std::mem;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Initial,
    InQuoted,
}

/// Split `input` into arguments on runs of whitespace.
///
/// A double-quote pair groups its content into one argument verbatim,
/// embedded whitespace included; the quote characters themselves are not
/// copied. A quoted empty string (`""`) produces an empty argument, but bare
/// whitespace never does.
///
/// Fails with [`Error::UnterminatedQuote`] if the line ends inside a quoted
/// span.
pub fn unquote(input: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut cur = String::new();
    let mut state = State::Initial;

    // An empty pending argument is only emitted right after a closing quote.
    let mut skip_empty = true;

    let mut column = 0;

    // Scan one past the end of the input, so a trailing terminator closes the
    // final argument through the same path as interior whitespace.
    for c in input.chars().map(Some).chain(std::iter::once(None)) {
        column += 1;

        match state {
            State::Initial => match c {
                Some('"') => {
                    state = State::InQuoted;
                },
                Some(c) if !c.is_ascii_whitespace() => {
                    cur.push(c);
                },
                _ => {
                    // Whitespace or end of input: close the pending argument.
                    if cur.is_empty() && skip_empty {
                        continue;
                    }
                    args.push(mem::take(&mut cur));
                    skip_empty = true;
                },
            },
            State::InQuoted => match c {
                Some('"') => {
                    state = State::Initial;

                    // The quoted span may be empty, but it is a real argument.
                    skip_empty = false;
                },
                Some(c) => {
                    cur.push(c);
                },
                None => {
                    return Err(Error::UnterminatedQuote { column });
                },
            },
        }
    }

    Ok(args)
}
