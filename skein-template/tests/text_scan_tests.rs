use skein_template::{Compiler, CompilerConfig, Delimiters, Token};

fn compiler() -> Compiler {
    Compiler::new(CompilerConfig::default()).unwrap()
}

fn binding(value: &str, html: bool, one_time: bool, raw: &str) -> Token {
    Token::Binding {
        value: value.to_string(),
        html,
        one_time,
        raw: raw.to_string(),
    }
}

fn reconstruct(tokens: &[Token]) -> String {
    tokens.iter().map(Token::source).collect()
}

#[test]
fn plain_text_is_one_literal() {
    let c = compiler();
    assert_eq!(c.scan_text("hello world"), vec![Token::text("hello world")]);
    assert_eq!(c.scan_text("line\nbreak\n"), vec![Token::text("linebreak")]);
    assert_eq!(c.scan_text(""), vec![Token::text("")]);
    assert_eq!(c.scan_text("{ not } {{}}"), vec![Token::text("{ not } {{}}")]);
}

#[test]
fn mixed_text_and_bindings_in_order() {
    let tokens = compiler().scan_text("a {{ b }} c {{{ d }}}");
    assert_eq!(
        tokens,
        vec![
            Token::text("a "),
            binding("b", false, false, "{{ b }}"),
            Token::text(" c "),
            binding("d", true, false, "{{{ d }}}"),
        ]
    );
}

#[test]
fn adjacent_bindings_have_no_empty_literal() {
    let tokens = compiler().scan_text("{{a}}{{{b}}}");
    assert_eq!(
        tokens,
        vec![
            binding("a", false, false, "{{a}}"),
            binding("b", true, false, "{{{b}}}"),
        ]
    );
}

#[test]
fn leading_star_marks_one_time() {
    let tokens = compiler().scan_text("{{*name}} {{{* html }}}");
    assert_eq!(
        tokens,
        vec![
            binding("name", false, true, "{{*name}}"),
            Token::text(" "),
            binding("html", true, true, "{{{* html }}}"),
        ]
    );
}

#[test]
fn star_after_whitespace_is_part_of_the_value() {
    let tokens = compiler().scan_text("{{ *name }}");
    assert_eq!(tokens, vec![binding("*name", false, false, "{{ *name }}")]);
}

#[test]
fn tokens_reconstruct_the_input() {
    let c = compiler();
    for input in [
        "J_{{name}}",
        "{{a}} and {{{b}}} and {{*c}}!",
        "pre {{ x | upper }}\n post",
        "{{{a}}}{{b}}tail",
        "no bindings here",
    ] {
        let tokens = c.scan_text(input);
        assert_eq!(reconstruct(&tokens), input.replace('\n', ""), "{input}");
    }
}

#[test]
fn custom_delimiters() {
    let config = CompilerConfig::default()
        .with_delimiters(Delimiters::new("[[", "]]"), Delimiters::new("[[!", "!]]"));
    let c = Compiler::new(config).unwrap();
    let tokens = c.scan_text("x [[ a ]] [[! b !]] {{c}}");
    assert_eq!(
        tokens,
        vec![
            Token::text("x "),
            binding("a", false, false, "[[ a ]]"),
            Token::text(" "),
            binding("b", true, false, "[[! b !]]"),
            Token::text(" {{c}}"),
        ]
    );
}

#[test]
fn shared_compiler_scans_from_many_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();

    let c = compiler();
    let inputs: Vec<String> = (0..16)
        .map(|i| format!("row {i}: {{{{item{i}}}}} / {{{{{{raw{i}}}}}}} end"))
        .collect();
    let expected: Vec<Vec<Token>> = inputs.iter().map(|s| c.scan_text(s)).collect();

    std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let c = &c;
                s.spawn(move || (0..200).map(|_| c.scan_text(input)).last())
            })
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            assert_eq!(handle.join().unwrap().as_ref(), Some(want));
        }
    });

    assert_eq!(expected[3].len(), 5);
}
