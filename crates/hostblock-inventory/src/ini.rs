//! INI inventory parsing.
//!
//! ```text
//! top.example.com            # before any header: group "ungrouped"
//!
//! [web]
//! web[01:03].example.com ansible_host=10.0.0.1 env="prod web"
//! db.example.com:2222
//!
//! [web:vars]
//! ntp_server = ntp.example.com
//!
//! [prod:children]
//! web
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Inventory, InventoryBuilder, UNGROUPED_GROUP};

/// Matches the first `[start:end]` or `[start:end:step]` range in a host pattern.
/// An empty start means `0`.
static RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]:]*):([^\[\]:]+)(?::(\d+))?\]").expect("Invalid host range regex")
});

#[derive(Debug)]
enum Section {
    Hosts(String),
    Vars(String),
    Children(String),
}

/// Parse an INI inventory document.
pub fn parse_ini(content: &str) -> Result<Inventory> {
    let mut builder = InventoryBuilder::new();
    let mut section = Section::Hosts(UNGROUPED_GROUP.to_string());

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_header(line, line_no)?;
            let (Section::Hosts(group) | Section::Vars(group) | Section::Children(group)) =
                &section;
            builder.add_group(group);
            continue;
        }

        match &section {
            Section::Hosts(group) => parse_host_line(&mut builder, group, line, line_no)?,
            Section::Vars(group) => {
                let (key, value) = parse_var(line, line_no)?;
                builder.set_group_var(group, &key, &value);
            }
            Section::Children(group) => {
                let tokens = tokenize(line, line_no)?;
                if let Some(child) = tokens.first() {
                    builder.add_child(group, child);
                }
            }
        }
    }

    builder.build()
}

fn parse_header(line: &str, line_no: usize) -> Result<Section> {
    let malformed = || Error::parse(line_no, format!("Malformed section header '{line}'"));
    let (inner, trailing) = line
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .ok_or_else(malformed)?;

    // Only a comment may follow the closing bracket.
    let trailing = trailing.trim_start();
    if !(trailing.is_empty() || trailing.starts_with('#') || trailing.starts_with(';')) {
        return Err(malformed());
    }
    let inner = inner.trim();

    let (name, kind) = match inner.split_once(':') {
        Some((name, kind)) => (name.trim(), Some(kind.trim())),
        None => (inner, None),
    };
    if name.is_empty() {
        return Err(Error::parse(line_no, "Empty group name"));
    }

    let name = name.to_string();
    match kind {
        None => Ok(Section::Hosts(name)),
        Some("vars") => Ok(Section::Vars(name)),
        Some("children") => Ok(Section::Children(name)),
        Some(other) => Err(Error::parse(
            line_no,
            format!("Unknown section type '{other}' for group '{name}'"),
        )),
    }
}

fn parse_host_line(
    builder: &mut InventoryBuilder,
    group: &str,
    line: &str,
    line_no: usize,
) -> Result<()> {
    let tokens = tokenize(line, line_no)?;
    let Some((pattern, assignments)) = tokens.split_first() else {
        return Ok(());
    };

    let mut vars = Vec::with_capacity(assignments.len() + 1);
    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            Error::parse(
                line_no,
                format!("Expected key=value after host, found '{assignment}'"),
            )
        })?;
        if key.is_empty() {
            return Err(Error::parse(line_no, "Empty variable name"));
        }
        vars.push((key.to_string(), value.to_string()));
    }

    let (pattern, port) = split_port(pattern);
    if let Some(port) = port {
        if !vars.iter().any(|(key, _)| key == "ansible_port") {
            vars.insert(0, ("ansible_port".to_string(), port.to_string()));
        }
    }

    for host in expand_hosts(pattern, line_no)? {
        builder.add_host(group, &host, vars.iter().cloned());
    }
    Ok(())
}

fn parse_var(line: &str, line_no: usize) -> Result<(String, String)> {
    let (key, value) = line.split_once('=').ok_or_else(|| {
        Error::parse(line_no, format!("Expected key=value in vars section, found '{line}'"))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::parse(line_no, "Empty variable name"));
    }
    Ok((key.to_string(), unquote(value.trim()).to_string()))
}

/// `host:port` with a numeric port. IPv6 addresses (several colons) are left alone.
fn split_port(pattern: &str) -> (&str, Option<&str>) {
    match pattern.split_once(':') {
        Some((host, port))
            if !host.is_empty()
                && !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit()) =>
        {
            (host, Some(port))
        }
        _ => (pattern, None),
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Split a line on whitespace, honoring single and double quotes. An
/// unquoted `#` at the start of a token begins a comment.
fn tokenize(line: &str, line_no: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        if escaped != q && escaped != '\\' {
                            current.push('\\');
                        }
                        current.push(escaped);
                    }
                }
                c if c == q => quote = None,
                c => current.push(c),
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                in_token = true;
            }
            '#' if !in_token => break,
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(Error::parse(line_no, "Unterminated quote"));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Expand `[a:b]` / `[a:b:step]` ranges, numeric (zero padding kept) or
/// single-letter alphabetic.
fn expand_hosts(pattern: &str, line_no: usize) -> Result<Vec<String>> {
    let Some(caps) = RANGE_REGEX.captures(pattern) else {
        return Ok(vec![pattern.to_string()]);
    };
    let Some(whole) = caps.get(0) else {
        return Ok(vec![pattern.to_string()]);
    };

    let prefix = &pattern[..whole.start()];
    let suffix = &pattern[whole.end()..];
    let step = match caps.get(3) {
        Some(step) => step
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|step| *step > 0)
            .ok_or_else(|| Error::parse(line_no, format!("Invalid range step in '{pattern}'")))?,
        None => 1,
    };

    let start = match &caps[1] {
        "" => "0",
        start => start,
    };
    let values = range_values(start, &caps[2], step)
        .ok_or_else(|| Error::parse(line_no, format!("Invalid host range in '{pattern}'")))?;

    let rest = expand_hosts(suffix, line_no)?;
    let mut hosts = Vec::with_capacity(values.len() * rest.len());
    for value in &values {
        for tail in &rest {
            hosts.push(format!("{prefix}{value}{tail}"));
        }
    }
    Ok(hosts)
}

fn range_values(start: &str, end: &str, step: usize) -> Option<Vec<String>> {
    if let (Ok(first), Ok(last)) = (start.parse::<u64>(), end.parse::<u64>()) {
        if first > last {
            return None;
        }
        let width = if start.len() > 1 && start.starts_with('0') {
            start.len()
        } else {
            0
        };
        return Some(
            (first..=last)
                .step_by(step)
                .map(|n| format!("{n:0width$}"))
                .collect(),
        );
    }

    let mut start_chars = start.chars();
    let mut end_chars = end.chars();
    match (
        start_chars.next(),
        start_chars.next(),
        end_chars.next(),
        end_chars.next(),
    ) {
        (Some(first), None, Some(last), None)
            if first.is_ascii_alphabetic() && last.is_ascii_alphabetic() && first <= last =>
        {
            Some(
                (first..=last)
                    .step_by(step)
                    .map(|c| c.to_string())
                    .collect(),
            )
        }
        _ => None,
    }
}
