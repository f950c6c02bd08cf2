//! Value normalization for composite comparison.

use crate::resource::Normalization;

/// Reduce `text` to its canonical form under `mode`.
pub fn normalize(mode: Normalization, text: &str) -> String {
    match mode {
        Normalization::Verbatim => tokenize(text).join(" "),
        Normalization::Compact => text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .collect(),
        Normalization::Unordered => parse_root(text).members(),
        Normalization::Pairs => parse_root(text).pairs(),
    }
}

fn parse_root(text: &str) -> Block {
    let tokens = tokenize(text);
    let mut cursor = 0;
    let mut root = parse_block(&tokens, &mut cursor);
    // `{ a b }` and `a b` describe the same members
    while let [Item::Child(name, _)] = root.items.as_slice() {
        if !name.is_empty() {
            break;
        }
        match root.items.pop() {
            Some(Item::Child(_, child)) => root = child,
            _ => break,
        }
    }
    root
}

/// `raw` without its leading `token`, if it starts with it.
pub fn strip_leading_token<'a>(raw: &'a str, token: &str) -> &'a str {
    let trimmed = raw.trim_start();
    match trimmed.strip_prefix(token) {
        Some(rest)
            if rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with('{') =>
        {
            rest.trim()
        }
        _ => trimmed.trim_end(),
    }
}

/// Split on whitespace and commas, with braces as tokens of their own.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        let separator = c.is_whitespace() || c == ',';
        let brace = c == '{' || c == '}';
        if separator || brace {
            if let Some(s) = start.take() {
                tokens.push(&text[s..i]);
            }
            if brace {
                tokens.push(&text[i..i + 1]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

#[derive(Debug)]
enum Item {
    Word(String),
    Child(String, Block),
}

#[derive(Debug, Default)]
struct Block {
    items: Vec<Item>,
}

impl Block {
    /// Every word and child block is a member; members are sorted.
    fn members(&self) -> String {
        let parts = self
            .items
            .iter()
            .map(|item| match item {
                Item::Word(word) => word.clone(),
                Item::Child(name, child) => child_entry(name, child.members()),
            })
            .collect();
        sorted(parts)
    }

    /// Words are read as `key value` pairs and a child block is the value
    /// of its name. Pairs are sorted, never the words inside one.
    fn pairs(&self) -> String {
        let mut parts = Vec::new();
        let mut items = self.items.iter().peekable();
        while let Some(item) = items.next() {
            match item {
                Item::Child(name, child) => parts.push(child_entry(name, child.pairs())),
                Item::Word(key) => match items.next_if(|next| matches!(next, Item::Word(_))) {
                    Some(Item::Word(value)) => parts.push(format!("{key} {value}")),
                    _ => parts.push(key.clone()),
                },
            }
        }
        sorted(parts)
    }
}

fn child_entry(name: &str, body: String) -> String {
    if !name.is_empty() && body.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{body}}}")
    }
}

fn sorted(mut parts: Vec<String>) -> String {
    parts.sort();
    parts.join(" ")
}

/// Parse tokens until the matching `}` (or the end). A word directly followed
/// by `{` names the child block it opens.
fn parse_block(tokens: &[&str], cursor: &mut usize) -> Block {
    let mut block = Block::default();
    while *cursor < tokens.len() {
        let token = tokens[*cursor];
        *cursor += 1;
        match token {
            "}" => return block,
            "{" => {
                let name = match block.items.pop() {
                    Some(Item::Word(word)) => word,
                    Some(other) => {
                        block.items.push(other);
                        String::new()
                    }
                    None => String::new(),
                };
                let child = parse_block(tokens, cursor);
                block.items.push(Item::Child(name, child));
            }
            word => block.items.push(Item::Word(word.to_string())),
        }
    }
    block
}
