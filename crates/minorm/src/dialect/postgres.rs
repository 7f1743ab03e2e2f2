use super::Dialect;
use crate::value::{Value, ValueKind};
use std::borrow::Cow;
use std::fmt::Write;

/// PostgreSQL, executed through `tokio-postgres`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn data_type_of(&self, kind: ValueKind) -> &'static str {
        match kind {
            ValueKind::Bool => "boolean",
            ValueKind::SmallInt => "smallint",
            ValueKind::Int => "integer",
            ValueKind::BigInt => "bigint",
            ValueKind::Real => "real",
            ValueKind::Double => "double precision",
            ValueKind::Text => "text",
            ValueKind::Bytes => "bytea",
            ValueKind::Date => "date",
            ValueKind::Timestamp => "timestamp",
            ValueKind::TimestampTz => "timestamptz",
            ValueKind::Uuid => "uuid",
            ValueKind::Json => "jsonb",
        }
    }

    fn table_exist_sql(&self, table: &str) -> (String, Vec<Value>) {
        (
            "SELECT tablename::text FROM pg_catalog.pg_tables \
             WHERE schemaname = current_schema() AND tablename = ?"
                .to_string(),
            vec![Value::Text(self.normalize_ident(table))],
        )
    }

    /// Number `?` markers as `$1, $2, ...`.
    ///
    /// Markers inside string literals, quoted identifiers, dollar-quoted
    /// bodies and comments are left alone. The jsonb operators `?`, `?|` and
    /// `?&` cannot be written directly; use `jsonb_exists`,
    /// `jsonb_exists_any` and `jsonb_exists_all` instead.
    fn rewrite_placeholders<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        if !sql.contains('?') {
            return Cow::Borrowed(sql);
        }

        let bytes = sql.as_bytes();
        let mut out = String::with_capacity(sql.len() + 8);
        let mut idx: usize = 0;
        let mut i = 0;

        while i < bytes.len() {
            let end = match bytes[i] {
                b'\'' => {
                    let escapes = i > 0
                        && matches!(bytes[i - 1], b'E' | b'e')
                        && (i < 2 || !is_ident_byte(bytes[i - 2]));
                    skip_quoted(bytes, i, b'\'', escapes)
                }
                b'"' => skip_quoted(bytes, i, b'"', false),
                b'-' if bytes.get(i + 1) == Some(&b'-') => sql[i..]
                    .find('\n')
                    .map_or(bytes.len(), |pos| i + pos + 1),
                b'/' if bytes.get(i + 1) == Some(&b'*') => skip_block_comment(bytes, i),
                b'$' => match dollar_tag_end(bytes, i) {
                    Some(tag_end) => {
                        let tag = &sql[i..tag_end];
                        sql[tag_end..]
                            .find(tag)
                            .map_or(bytes.len(), |pos| tag_end + pos + tag.len())
                    }
                    None => i + 1,
                },
                b'?' => {
                    idx += 1;
                    let _ = write!(&mut out, "${}", idx);
                    i += 1;
                    continue;
                }
                _ => {
                    let mut j = i + 1;
                    while j < bytes.len() && !is_special(bytes[j]) {
                        j += 1;
                    }
                    j
                }
            };
            out.push_str(&sql[i..end]);
            i = end;
        }
        Cow::Owned(out)
    }

    // Unquoted identifiers are folded to lower case by the server.
    fn normalize_ident(&self, ident: &str) -> String {
        ident.to_lowercase()
    }
}

fn is_special(b: u8) -> bool {
    matches!(b, b'\'' | b'"' | b'-' | b'/' | b'$' | b'?')
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// End (exclusive) of the literal opened at `start`. A doubled quote stays
/// inside; with `backslash` a backslash escapes the next byte.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8, backslash: bool) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if backslash && bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

// Block comments nest.
fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return i;
                }
            }
            _ => i += 1,
        }
    }
    bytes.len()
}

/// End of a `$tag$` opener at `start`, if one starts there.
fn dollar_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    if start > 0 && is_ident_byte(bytes[start - 1]) {
        return None;
    }
    let mut j = start + 1;
    match bytes.get(j) {
        Some(b'$') => return Some(j + 1),
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return None,
    }
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'_') {
        j += 1;
    }
    (bytes.get(j) == Some(&b'$')).then_some(j + 1)
}
