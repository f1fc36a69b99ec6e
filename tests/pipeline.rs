use indoc::indoc;
use pretty_assertions::assert_eq;
use toyc::{compile, compile_with, stdlib::JAVA, Options};

#[test]
fn compiles_a_whole_program() {
    let src = indoc! {r#"
        LET limit: INTEGER = 5;
        LET i: INTEGER = 0;
        LET total: DECIMAL = 0.0;
        WHILE i != limit DO
            total = total + i * 1.5;
            i = i + 1;
        END
        IF total == 15.0 THEN
            PRINT("total is " + total);
        ELSE
            PRINT("unexpected");
        END
    "#};
    let expected = indoc! {r#"
        public final class Main {

            public static void main(String[] args) {
                int limit = 5;
                int i = 0;
                double total = 0.0;
                while (i != limit) {
                    total = total + i * 1.5;
                    i = i + 1;
                }
                if (total == 15.0) {
                    System.out.println("total is " + total);
                } else {
                    System.out.println("unexpected");
                }
            }

        }
    "#};
    assert_eq!(compile(src, &JAVA).unwrap(), expected);
}

#[test]
fn uses_the_configured_class_name() {
    let options = Options {
        class_name: "Hello".to_owned(),
    };
    let code = compile_with(r#"PRINT("hello");"#, &JAVA, &options).unwrap();
    assert!(code.starts_with("public final class Hello {\n"), "{code}");
    assert!(code.contains("System.out.println(\"hello\");"), "{code}");
}

#[test]
fn reports_the_failing_stage() {
    let cases = [
        (r#"PRINT("open"#, "lex", "unterminated string", (1, 7)),
        ("LET x INTEGER;", "parse", "expected `:` after the variable name", (1, 7)),
        ("", "analysis", "empty program", (1, 1)),
        (
            "LET x: INTEGER;\nx = TRUE;",
            "analysis",
            "type BOOLEAN is not assignable to type INTEGER",
            (2, 5),
        ),
    ];
    for (src, kind, message, line_col) in cases {
        let error = compile(src, &JAVA).unwrap_err();
        assert_eq!(error.kind(), kind, "{src:?}");
        assert_eq!(error.message(), message, "{src:?}");
        assert_eq!(error.line_col(src), line_col, "{src:?}");
    }
}

#[test]
fn compiles_the_demo_programs() {
    for src in [
        include_str!("../demos/hello.toy"),
        include_str!("../demos/countdown.toy"),
        include_str!("../demos/big.toy"),
    ] {
        let code = compile(src, &JAVA).unwrap();
        assert!(code.starts_with("public final class Main {"));
        assert!(code.ends_with("}\n"));
    }
}

#[test]
fn nested_block_may_hide_an_outer_variable() {
    let src = r#"LET x: INTEGER = 1; WHILE FALSE DO LET x: STRING = "a"; PRINT(x); END"#;
    let code = compile(src, &JAVA).unwrap();
    assert!(code.contains("        int x = 1;\n"), "{code}");
    assert!(code.contains("            String x$1 = \"a\";\n"), "{code}");
    assert!(code.contains("            System.out.println(x$1);\n"), "{code}");

    let error = compile("LET x: INTEGER; LET x: STRING;", &JAVA).unwrap_err();
    assert_eq!(error.message(), "x is already declared");
}
