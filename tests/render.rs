#![cfg(feature = "serde")]

use stencil::{value, Engine, ErrorKind};

#[test]
fn render_plain_text_round_trip() {
    let engine = Engine::new();
    for text in [
        "This is a simple message.",
        "<h1>This is a html message.</h1>",
        "This is a multi message\nThis is line 2 of the message",
        "Stray }} and #} and %} are just text",
    ] {
        let result = engine.compile(text).unwrap().render(value! {}).unwrap();
        assert_eq!(result, text);
    }
}

#[test]
fn render_whitespace_only_template() {
    let result = Engine::new()
        .compile("  \n\t ")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "");
}

#[test]
fn render_expr_single() {
    let result = Engine::new()
        .compile("Hello, {{name}}!")
        .unwrap()
        .render(value! { name: "Bob" })
        .unwrap();
    assert_eq!(result, "Hello, Bob!");
}

#[test]
fn render_expr_multi() {
    let result = Engine::new()
        .compile("Hello, {{user}} at {{year}}!")
        .unwrap()
        .render(value! { user: "Alice", year: 2020 })
        .unwrap();
    assert_eq!(result, "Hello, Alice at 2020!");
}

#[test]
fn render_expr_value_kinds() {
    let result = Engine::new()
        .compile("{{ b }},{{ i }},{{ f }},{{ s }},[{{ n }}]")
        .unwrap()
        .render(value! { b: true, i: -7, f: 1.5, s: "str", n: None })
        .unwrap();
    assert_eq!(result, "true,-7,1.5,str,[]");
}

#[test]
fn render_expr_list_index() {
    let result = Engine::new()
        .compile("hello, {{names[0]}} and {{ names.1 }}")
        .unwrap()
        .render(value! { names: ["guest", "host"] })
        .unwrap();
    assert_eq!(result, "hello, guest and host");
}

#[test]
fn render_expr_map_key() {
    let result = Engine::new()
        .compile(r#"Hello, {{names['guest']}}, {{ names["host"] }}, {{ names.guest }}!"#)
        .unwrap()
        .render(value! { names: { guest: 123, host: 456 } })
        .unwrap();
    assert_eq!(result, "Hello, 123, 456, 123!");
}

#[test]
fn render_expr_literals() {
    let result = Engine::new()
        .compile(r#"{{ "it's" }}, {{ 'say "hi"' }}, {{ 42 }}, {{ -0.5 }}, {{ false }}"#)
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, r#"it's, say "hi", 42, -0.5, false"#);
}

#[cfg(feature = "builtins")]
#[test]
fn render_expr_with_filters() {
    let result = Engine::new()
        .compile("Hello, {{ name | upper | strip }}!")
        .unwrap()
        .render(value! { name: "  Bob  " })
        .unwrap();
    assert_eq!(result, "Hello, BOB!");
}

#[test]
fn render_expr_filter_order() {
    let mut engine = Engine::new();
    engine.add_filter("a", |s: String| format!("a({s})"));
    engine.add_filter("b", |s: String| format!("b({s})"));
    let result = engine
        .compile("{{ x | a | b }}")
        .unwrap()
        .render(value! { x: "x" })
        .unwrap();
    assert_eq!(result, "b(a(x))");
}

#[cfg(feature = "builtins")]
#[test]
fn render_expr_filter_on_literal() {
    let result = Engine::new()
        .compile("{{ 'a string with | inside' | upper | strip }}")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "A STRING WITH | INSIDE");
}

#[test]
fn render_comment() {
    let result = Engine::new()
        .compile("Hello, {# note #}World!")
        .unwrap()
        .render(value! {})
        .unwrap();
    assert_eq!(result, "Hello, World!");
}

#[test]
fn render_comment_with_expr() {
    let result = Engine::new()
        .compile("Hello, {# This is a comment. #}{{name}}!")
        .unwrap()
        .render(value! { name: "Alice" })
        .unwrap();
    assert_eq!(result, "Hello, Alice!");
}

#[test]
fn render_for_loop() {
    let result = Engine::new()
        .compile("{% for msg in messages %}Item {{msg}}!{% endfor %}")
        .unwrap()
        .render(value! { messages: ["a", "b", "c"] })
        .unwrap();
    assert_eq!(result, "Item a!Item b!Item c!");
}

#[test]
fn render_for_loop_index1() {
    let result = Engine::new()
        .compile("{% for msg in messages %}{{loop.index1}}.{{msg}}!{% endfor %}")
        .unwrap()
        .render(value! { messages: ["a", "b", "c"] })
        .unwrap();
    assert_eq!(result, "1.a!2.b!3.c!");
}

#[test]
fn render_for_loop_indices() {
    let result = Engine::new()
        .compile("{% for x in xs %}{{ loop.index0 }}{{ loop.index }}{{ loop.index1 }},{% endfor %}")
        .unwrap()
        .render(value! { xs: [true, false, true] })
        .unwrap();
    assert_eq!(result, "001,112,223,");
}

#[test]
fn render_for_loop_empty() {
    let result = Engine::new()
        .compile("before{% for x in xs %}never{% endfor %}after")
        .unwrap()
        .render(value! { xs: [] })
        .unwrap();
    assert_eq!(result, "beforeafter");
}

#[test]
fn render_for_loop_map_keys() {
    let result = Engine::new()
        .compile("{% for key in map %}{{ key }};{% endfor %}")
        .unwrap()
        .render(value! { map: { b: 2, a: 1, c: 3 } })
        .unwrap();
    assert_eq!(result, "a;b;c;");
}

#[test]
fn render_for_loop_item_path() {
    let result = Engine::new()
        .compile("{% for user in users %}{{ user.name }}({{ user.age }}) {% endfor %}")
        .unwrap()
        .render(value! { users: [{ name: "Alice", age: 30 }, { name: "Bob", age: 25 }] })
        .unwrap();
    assert_eq!(result, "Alice(30) Bob(25) ");
}

#[test]
fn render_for_loop_nested() {
    let result = Engine::new()
        .compile(
            "{% for row in rows %}{{ loop.index1 }}:{% for cell in row %}\
             {{ loop.index0 }}={{ cell }},{% endfor %};{% endfor %}",
        )
        .unwrap()
        .render(value! { rows: [["a", "b"], ["c"]] })
        .unwrap();
    assert_eq!(result, "1:0=a,1=b,;2:0=c,;");
}

#[test]
fn render_for_loop_shadows_global() {
    let result = Engine::new()
        .compile("{{ x }}{% for x in xs %}{{ x }}{% endfor %}{{ x }}")
        .unwrap()
        .render(value! { x: "g", xs: ["1", "2"] })
        .unwrap();
    assert_eq!(result, "g12g");
}

#[test]
fn render_for_loop_global_in_body() {
    let result = Engine::new()
        .compile("{% for x in xs %}{{ sep }}{{ x }}{% endfor %}")
        .unwrap()
        .render(value! { sep: "-", xs: [1, 2] })
        .unwrap();
    assert_eq!(result, "-1-2");
}

#[cfg(feature = "builtins")]
#[test]
fn render_is_idempotent() {
    let engine = Engine::new();
    let template = engine
        .compile("{% for x in xs %}{{ x | upper }}{% endfor %}")
        .unwrap();
    let ctx = value! { xs: ["a", "b"] };
    let first = template.render(&ctx).unwrap();
    let second = template.render(&ctx).unwrap();
    assert_eq!(first, "AB");
    assert_eq!(first, second);
}

#[cfg(feature = "builtins")]
#[test]
fn compile_twice_behaves_the_same() {
    let engine = Engine::new();
    let source = "{# users #}{% for u in users %}{{ loop.index1 }}:{{ u.name | strip | upper }};{% endfor %}";
    let a = engine.compile(source).unwrap();
    let b = engine.compile(source).unwrap();

    let ctx = value! { users: [{ name: " ann " }, { name: "bo" }] };
    let result = a.render(&ctx).unwrap();
    assert_eq!(result, "1:ANN;2:BO;");
    assert_eq!(b.render(&ctx).unwrap(), result);

    let bad = value! { users: [{ name: "ann" }, { age: 3 }] };
    let err_a = a.render(&bad).unwrap_err();
    let err_b = b.render(&bad).unwrap_err();
    assert_eq!(err_a.message(), "not found in map");
    assert_eq!(format!("{:#}", err_a), format!("{:#}", err_b));
}

#[test]
fn render_err_not_found_in_scope() {
    let err = Engine::new()
        .compile("{{name}}")
        .unwrap()
        .render(value! {})
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | {{name}}
   |   ^^^^ not found in this scope
"
    );
}

#[test]
fn render_err_loop_variable_out_of_scope() {
    let err = Engine::new()
        .compile("{% for x in xs %}{% endfor %}{{ x }}")
        .unwrap()
        .render(value! { xs: [1] })
        .unwrap_err();
    assert_eq!(err.message(), "not found in this scope");
}

#[test]
fn render_err_loop_state_outside_loop() {
    let err = Engine::new()
        .compile("{{ loop.index }}")
        .unwrap()
        .render(value! {})
        .unwrap_err();
    assert_eq!(err.message(), "not found in this scope");
}

#[cfg(feature = "builtins")]
#[test]
fn render_err_unknown_filter() {
    let err = Engine::new()
        .compile("Hello, {{ name | upper | shout }}!")
        .unwrap()
        .render(value! { name: "alice" })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Render);
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | Hello, {{ name | upper | shout }}!
   |                          ^^^^^ unknown filter
"
    );
}

#[test]
fn render_err_not_iterable() {
    let err = Engine::new()
        .compile("{% for x in xs %}{% endfor %}")
        .unwrap()
        .render(value! { xs: 5 })
        .unwrap_err();
    assert_eq!(
        format!("{:#}", err),
        "
   |
 1 | {% for x in xs %}{% endfor %}
   |             ^^ expected iterable, but expression evaluated to integer
"
    );
}

#[test]
fn render_err_not_found_in_map() {
    let err = Engine::new()
        .compile("{{ user.name }}")
        .unwrap()
        .render(value! { user: { age: 1 } })
        .unwrap_err();
    assert_eq!(err.to_string(), "not found in map between bytes 8 and 12");
}

#[test]
fn render_err_index_out_of_bounds() {
    let err = Engine::new()
        .compile("{{ names[3] }}")
        .unwrap()
        .render(value! { names: ["a"] })
        .unwrap_err();
    assert_eq!(err.message(), "index out of bounds");
}

#[test]
fn render_err_index_into_string() {
    let err = Engine::new()
        .compile("{{ name.first }}")
        .unwrap()
        .render(value! { name: "Bob" })
        .unwrap_err();
    assert_eq!(err.message(), "cannot index into string");
}

#[test]
fn render_expr_list_and_map() {
    let result = Engine::new()
        .compile("{{ names }}; {{ user }}; {{ ratio }}")
        .unwrap()
        .render(value! {
            names: ["a", "b"],
            user: { name: "Bob", age: 3 },
            ratio: 2.0,
        })
        .unwrap();
    assert_eq!(result, "[a, b]; {age: 3, name: Bob}; 2.0");
}

#[test]
fn render_err_does_not_poison_template() {
    let engine = Engine::new();
    let template = engine.compile("Hello, {{ name }}!").unwrap();
    assert!(template.render(value! {}).is_err());
    let result = template.render(value! { name: "Bob" }).unwrap();
    assert_eq!(result, "Hello, Bob!");
}
