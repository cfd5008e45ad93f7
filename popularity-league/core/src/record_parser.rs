// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{LeagueError, Result};
use crate::types::{PageId, RecordLocation};

/// Punctuation that separates identifiers, in addition to whitespace
const PUNCTUATION: &str = ",;.?!-:@[](){}_*/";

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION.contains(c)
}

/// One line of the corpus: a page followed by the pages it links to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub source: PageId,
    pub targets: Vec<PageId>,
}

impl LinkRecord {
    /// Parses one corpus line
    ///
    /// Returns `Ok(None)` for a line without any token. Every token has to be
    /// an integer; the first one is the source, the rest are targets in order,
    /// duplicates included.
    pub fn parse(line: &str, location: &RecordLocation) -> Result<Option<Self>> {
        let mut ids = line
            .split(is_delimiter)
            .filter(|token| !token.is_empty())
            .map(|token| parse_id(token, location));

        let source = match ids.next() {
            Some(id) => id?,
            None => return Ok(None),
        };
        let targets = ids.collect::<Result<Vec<_>>>()?;

        Ok(Some(Self { source, targets }))
    }

    /// The `(id, increment)` pairs this record contributes to the counts
    ///
    /// The source contributes `0` so that it shows up in the count table
    /// even if nothing links to it.
    pub fn increments(&self) -> impl Iterator<Item = (PageId, u64)> + '_ {
        std::iter::once((self.source, 0)).chain(self.targets.iter().map(|&target| (target, 1)))
    }
}

/// Decodes one raw line, dropping a trailing carriage return
pub(crate) fn decode_line(mut raw: Vec<u8>, location: &RecordLocation) -> Result<String> {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw)
        .map_err(|e| LeagueError::parse(location.clone(), String::from_utf8_lossy(e.as_bytes())))
}

pub(crate) fn parse_id(token: &str, location: &RecordLocation) -> Result<PageId> {
    token
        .parse::<PageId>()
        .map_err(|_| LeagueError::parse(location.clone(), token))
}
