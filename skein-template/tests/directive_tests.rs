use skein_template::{Compiler, CompilerConfig, DirectiveError, Expr, ExpressionError};

fn compiler() -> Compiler {
    Compiler::new(CompilerConfig::default()).unwrap()
}

#[test]
fn interpolated_attribute_becomes_bind() {
    let d = compiler().parse_directive("id", "J_{{name}}").unwrap();
    assert_eq!(d.name, "id");
    assert_eq!(d.value, "J_{{name}}");
    assert_eq!(d.directive, "bind");
    assert_eq!(d.args, vec!["id".to_string()]);
    assert!(d.is_interpolation);
    assert!(!d.html);
    assert!(!d.one_time);
    assert_eq!(d.expression, r#""J_" + _scope.name"#);
    assert_eq!(
        d.tree,
        Expr::Concat {
            parts: vec![Expr::string("J_"), Expr::scope("name")]
        }
    );
}

#[test]
fn single_binding_is_not_wrapped() {
    let d = compiler().parse_directive("title", "{{ a + 1 }}").unwrap();
    assert_eq!(d.expression, "_scope.a + 1");
}

#[test]
fn merged_parts_keep_their_grouping() {
    let d = compiler()
        .parse_directive("class", "col-{{ a - b }} {{ big ? 'lg' : 'sm' }}")
        .unwrap();
    assert_eq!(
        d.expression,
        r#""col-" + (_scope.a - _scope.b) + " " + (_scope.big ? "lg" : "sm")"#
    );
}

#[test]
fn leading_bindings_concatenate_as_text() {
    let c = compiler();
    assert_eq!(
        c.parse_directive("title", "{{a}}{{b}}").unwrap().expression,
        r#""" + _scope.a + _scope.b"#
    );
    assert_eq!(
        c.parse_directive("title", "{{a}}{{b}}x").unwrap().expression,
        r#""" + _scope.a + _scope.b + "x""#
    );
}

#[test]
fn one_time_requires_every_binding() {
    let c = compiler();
    assert!(c.parse_directive("title", "{{*a}}-{{*b}}").unwrap().one_time);
    assert!(!c.parse_directive("title", "{{*a}}-{{b}}").unwrap().one_time);
    assert!(!c.parse_directive("title", "{{a}}").unwrap().one_time);
}

#[test]
fn any_raw_binding_makes_html() {
    let c = compiler();
    assert!(c.parse_directive("title", "{{a}} {{{b}}} {{c}}").unwrap().html);
    assert!(c.parse_directive("title", "{{{b}}}").unwrap().html);
    assert!(!c.parse_directive("title", "{{a}} {{c}}").unwrap().html);
}

#[test]
fn filter_in_interpolation() {
    let d = compiler().parse_directive("title", "Hi {{ name | upper }}").unwrap();
    assert_eq!(
        d.expression,
        r#""Hi " + _that.applyFilter("_scope.name", "upper")"#
    );
}

#[test]
fn plain_directive() {
    let d = compiler().parse_directive("sk-bind", "test.text").unwrap();
    assert_eq!(d.directive, "bind");
    assert!(d.args.is_empty());
    assert_eq!(d.expression, "_scope.test.text");
    assert!(!d.html);
    assert!(!d.one_time);
    assert!(!d.is_interpolation);
}

#[test]
fn directive_arguments_split_on_pipe() {
    let c = Compiler::new(CompilerConfig::default().with_prefix("p")).unwrap();
    let d = c.parse_directive("p-for:item|once", "list").unwrap();
    assert_eq!(d.directive, "for");
    assert_eq!(d.args, vec!["item".to_string(), "once".to_string()]);
    assert_eq!(d.expression, "_scope.list");
}

#[test]
fn empty_argument_list_after_colon() {
    let d = compiler().parse_directive("sk-on:", "handler").unwrap();
    assert_eq!(d.directive, "on");
    assert!(d.args.is_empty());

    let d = compiler().parse_directive("sk-on:click", "handler").unwrap();
    assert_eq!(d.args, vec!["click".to_string()]);
}

#[test]
fn directive_value_with_filter() {
    let d = compiler().parse_directive("sk-text", "a + 1 | upper").unwrap();
    assert_eq!(d.expression, r#"_that.applyFilter("_scope.a + 1", "upper")"#);
    let d = compiler().parse_directive("sk-text", "a + 1").unwrap();
    assert_eq!(d.expression, "_scope.a + 1");
}

#[test]
fn unprefixed_name_is_a_mismatch() {
    let c = compiler();
    for name in ["id", "skbind", "sk-", "sk-:x", "v-if"] {
        assert!(
            matches!(
                c.parse_directive(name, "a"),
                Err(DirectiveError::NamingMismatch { .. })
            ),
            "{name}"
        );
    }
}

#[test]
fn interpolation_inside_directive_is_rejected() {
    let err = compiler().parse_directive("sk-bind", "{{a}}").unwrap_err();
    assert_eq!(
        err,
        DirectiveError::MixedDirective {
            name: "sk-bind".to_string(),
            value: "{{a}}".to_string()
        }
    );
}

#[test]
fn expression_errors_name_the_attribute() {
    let c = compiler();
    match c.parse_directive("sk-model", "a = 1") {
        Err(DirectiveError::Expression { name, source }) => {
            assert_eq!(name, "sk-model");
            assert!(matches!(source, ExpressionError::Unsupported { .. }));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
        c.parse_directive("title", "x {{ a ++ }}"),
        Err(DirectiveError::Expression { .. })
    ));
    assert!(matches!(
        c.parse_directive("sk-show", ""),
        Err(DirectiveError::Expression {
            source: ExpressionError::Empty,
            ..
        })
    ));
}

#[test]
fn descriptor_serializes_camel_case() {
    let d = compiler().parse_directive("sk-if", "ok").unwrap();
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["directive"], "if");
    assert_eq!(json["oneTime"], false);
    assert_eq!(json["isInterpolation"], false);
    assert_eq!(json["expression"], "_scope.ok");
    assert_eq!(json["tree"]["kind"], "scope");
}
