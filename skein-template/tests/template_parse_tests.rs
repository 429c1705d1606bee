use skein_template::{Node, TemplateError, parse_template_to_ast};

#[test]
fn parse_element_with_text() {
    let ast = parse_template_to_ast("<div>hi</div>").unwrap();
    assert_eq!(ast.len(), 1);
    match &ast[0] {
        Node::Element { tag, children, .. } => {
            assert_eq!(tag, "div");
            assert_eq!(children.len(), 1);
            assert!(matches!(children[0], Node::Text(_)));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn interpolation_stays_inside_text() {
    let ast = parse_template_to_ast("<p>Hello {{name}} and {{{ raw }}}</p>").unwrap();
    match &ast[0] {
        Node::Element { children, .. } => {
            assert_eq!(children, &vec![Node::Text("Hello {{name}} and {{{ raw }}}".into())]);
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn less_than_in_text_is_not_a_tag() {
    let ast = parse_template_to_ast("<p>1 < 2</p>").unwrap();
    match &ast[0] {
        Node::Element { children, .. } => assert_eq!(children, &vec![Node::Text("1 < 2".into())]),
        _ => panic!("expected element"),
    }
}

#[test]
fn parse_directive_attribute_names_verbatim() {
    let ast = parse_template_to_ast(
        r#"<li sk-for:item|once="list" class=row data-x='{{ id }}' hidden/>"#,
    )
    .unwrap();
    match &ast[0] {
        Node::Element {
            attrs,
            self_closing,
            ..
        } => {
            assert!(*self_closing);
            let pairs: Vec<(&str, Option<&str>)> = attrs
                .iter()
                .map(|a| (a.name.as_str(), a.value.as_deref()))
                .collect();
            assert_eq!(
                pairs,
                vec![
                    ("sk-for:item|once", Some("list")),
                    ("class", Some("row")),
                    ("data-x", Some("{{ id }}")),
                    ("hidden", None),
                ]
            );
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn comments_are_dropped_and_nesting_kept() {
    let ast = parse_template_to_ast("<ul><!-- items --><li>a</li><li>b</li></ul>").unwrap();
    match &ast[0] {
        Node::Element { children, .. } => {
            assert_eq!(children.len(), 2);
            assert!(children.iter().all(|c| matches!(c, Node::Element { tag, .. } if tag == "li")));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn unclosed_children_are_kept() {
    let ast = parse_template_to_ast("<div><p>one</div>").unwrap();
    assert_eq!(ast.len(), 1);
    match &ast[0] {
        Node::Element { tag, children, .. } => {
            assert_eq!(tag, "div");
            assert!(matches!(&children[0], Node::Element { tag, .. } if tag == "p"));
        }
        _ => panic!("expected element"),
    }
}

#[test]
fn syntax_errors() {
    assert!(matches!(
        parse_template_to_ast(r#"<div id="open>"#),
        Err(TemplateError::Syntax { offset: 8, .. })
    ));
    assert!(matches!(
        parse_template_to_ast("<div"),
        Err(TemplateError::Syntax { offset: 0, .. })
    ));
    assert!(matches!(
        parse_template_to_ast("<!-- never closed"),
        Err(TemplateError::Syntax { .. })
    ));
}
