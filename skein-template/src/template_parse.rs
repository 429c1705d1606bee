use crate::error::TemplateError;
use crate::template_ast::{Node, TemplateAttr};

/// Minimal hand-rolled HTML-ish parser with support for:
/// - nested elements and self-closing tags (`<input/>`)
/// - quoted, unquoted and boolean attributes, names kept verbatim (`sk-for:item|once`)
/// - text runs, interpolation left in place for the scanner
/// - `<!-- comments -->`, dropped
pub fn parse_template_to_ast(input: &str) -> Result<Vec<Node>, TemplateError> {
    let mut i = 0usize;
    let bytes = input.as_bytes();
    let mut stack: Vec<Node> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    fn push_child(stack: &mut Vec<Node>, roots: &mut Vec<Node>, node: Node) {
        if let Some(Node::Element { children, .. }) = stack.last_mut() {
            children.push(node);
        } else {
            roots.push(node);
        }
    }

    while i < bytes.len() {
        if starts_comment(bytes, i) {
            let Some(end) = input[i + 4..].find("-->") else {
                return Err(syntax(i, "unterminated comment"));
            };
            i += 4 + end + 3;
            continue;
        }

        if starts_tag(bytes, i) {
            // closing tag?
            if bytes[i + 1] == b'/' {
                i += 2;
                let tag = read_ident(input, &mut i);
                skip_ws(bytes, &mut i);
                if i < bytes.len() && bytes[i] == b'>' {
                    i += 1;
                }
                // pop until matching tag; unmatched closers are ignored
                if stack
                    .iter()
                    .any(|n| matches!(n, Node::Element { tag: t, .. } if *t == tag))
                {
                    while let Some(n) = stack.pop() {
                        let matched = matches!(&n, Node::Element { tag: t, .. } if *t == tag);
                        push_child(&mut stack, &mut roots, n);
                        if matched {
                            break;
                        }
                    }
                }
                continue;
            }

            // opening or self-closing tag
            let open_at = i;
            i += 1;
            let tag = read_ident(input, &mut i);
            let mut attrs: Vec<TemplateAttr> = Vec::new();
            let mut self_closing = false;

            loop {
                skip_ws(bytes, &mut i);
                if i >= bytes.len() {
                    return Err(syntax(open_at, &format!("unterminated <{tag}> tag")));
                }
                match bytes[i] {
                    b'/' => {
                        self_closing = true;
                        i += 1;
                        skip_ws(bytes, &mut i);
                        if i < bytes.len() && bytes[i] == b'>' {
                            i += 1;
                        }
                        break;
                    }
                    b'>' => {
                        i += 1;
                        break;
                    }
                    _ => match read_attribute(input, &mut i)? {
                        Some(attr) => attrs.push(attr),
                        // skip unknown token
                        None => i += 1,
                    },
                }
            }

            let element = Node::Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing,
            };
            if self_closing {
                push_child(&mut stack, &mut roots, element);
            } else {
                stack.push(element);
            }
        } else {
            // text until the next tag or comment
            let start = i;
            i += 1;
            while i < bytes.len() && !starts_tag(bytes, i) && !starts_comment(bytes, i) {
                i += 1;
            }
            let mut text = input[start..i].to_string();
            if is_all_ws(&text) {
                // keep a single space between inline elements
                text = " ".to_string();
            }
            push_child(&mut stack, &mut roots, Node::Text(text));
        }
    }

    // Unclosed tags: drain stack to roots (best-effort)
    while let Some(n) = stack.pop() {
        push_child(&mut stack, &mut roots, n);
    }

    roots.retain(|n| match n {
        Node::Text(t) => !is_all_ws(t),
        _ => true,
    });

    Ok(roots)
}

fn syntax(offset: usize, message: &str) -> TemplateError {
    TemplateError::Syntax {
        offset,
        message: message.to_string(),
    }
}

fn starts_tag(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'<'
        && bytes
            .get(i + 1)
            .is_some_and(|&c| c.is_ascii_alphabetic() || c == b'/')
}

fn starts_comment(bytes: &[u8], i: usize) -> bool {
    bytes[i..].starts_with(b"<!--")
}

fn is_all_ws(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace())
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn read_ident(input: &str, i: &mut usize) -> String {
    let bytes = input.as_bytes();
    let start = *i;
    while *i < bytes.len() {
        let c = bytes[*i];
        if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b':' {
            *i += 1;
        } else {
            break;
        }
    }
    input[start..*i].to_string()
}

fn is_name_byte(c: u8) -> bool {
    !(c.is_ascii_whitespace() || matches!(c, b'=' | b'>' | b'/' | b'"' | b'\'' | b'<'))
}

fn read_attribute(input: &str, i: &mut usize) -> Result<Option<TemplateAttr>, TemplateError> {
    let bytes = input.as_bytes();
    let name_start = *i;
    while *i < bytes.len() && is_name_byte(bytes[*i]) {
        *i += 1;
    }
    if *i == name_start {
        return Ok(None);
    }
    let name = input[name_start..*i].to_string();

    skip_ws(bytes, i);
    let mut value: Option<String> = None;
    if *i < bytes.len() && bytes[*i] == b'=' {
        *i += 1;
        skip_ws(bytes, i);
        value = Some(read_value(input, i)?);
    }

    Ok(Some(TemplateAttr { name, value }))
}

fn read_value(input: &str, i: &mut usize) -> Result<String, TemplateError> {
    let bytes = input.as_bytes();
    if *i >= bytes.len() {
        return Err(syntax(*i, "missing attribute value"));
    }
    let quote = bytes[*i];
    if quote != b'"' && quote != b'\'' {
        // unquoted: up to whitespace or tag end
        let start = *i;
        while *i < bytes.len() && !bytes[*i].is_ascii_whitespace() && bytes[*i] != b'>' {
            *i += 1;
        }
        return Ok(input[start..*i].to_string());
    }
    let open_at = *i;
    *i += 1;
    let start = *i;
    while *i < bytes.len() && bytes[*i] != quote {
        *i += 1;
    }
    if *i >= bytes.len() {
        return Err(syntax(open_at, "unterminated attribute value"));
    }
    let s = input[start..*i].to_string();
    *i += 1; // consume closing quote
    Ok(s)
}
