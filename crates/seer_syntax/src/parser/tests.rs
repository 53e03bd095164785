use super::*;
use crate::position::Position;

fn parse(source: &str) -> Module {
    let grammar = Grammar::python().unwrap();
    parse_module(&grammar, source).unwrap()
}

#[test]
fn test_import_tree() {
    let module = parse("import os\n");
    insta::assert_snapshot!(module.dump(), @r#"
    file_input
      simple_stmt
        import_name
          keyword "import" @1:0
          name "os" @1:7
        newline "\n" @1:9
      endmarker "" @2:0
    "#);
    assert!(module.error_statements().is_empty());
}

#[test]
fn test_single_name_keeps_expr_stmt() {
    let module = parse("a\n");
    insta::assert_snapshot!(module.dump(), @r#"
    file_input
      simple_stmt
        expr_stmt
          name "a" @1:0
        newline "\n" @1:1
      endmarker "" @2:0
    "#);
}

#[test]
fn test_code_round_trips() {
    for source in [
        "import os\n",
        "def f(a, b=1):\n    return a.b\n",
        "x = [i for i in y]  # done\n",
        "if a:\n    pass\nelse:\n    b()\n",
        "import os.\n",
        "def f(:\n  x\n",
        "  indented\n",
        "no_newline",
    ] {
        assert_eq!(parse(source).code(), source, "source {source:?}");
    }
}

#[test]
fn test_unfinished_import_becomes_error_statement() {
    let module = parse("import os.\n");
    insta::assert_snapshot!(module.dump(), @r#"
    file_input
      error_node
        keyword "import" @1:0
        name "os" @1:7
        operator "." @1:9
      newline "\n" @1:10
      endmarker "" @2:0
    "#);

    let [statement] = module.error_statements() else {
        panic!("expected one error statement");
    };
    assert_eq!(statement.first_type(), "import_name");
    assert_eq!(statement.next_token(), "\n");
    assert_eq!(statement.start(), Position::new(1, 0));
    assert_eq!(statement.end(), Position::new(1, 10));
    let rules: Vec<&str> = statement.stack().iter().map(|(name, _)| name.as_ref()).collect();
    assert_eq!(rules, ["import_name", "dotted_as_names", "dotted_as_name", "dotted_name"]);
}

#[test]
fn test_stray_token_becomes_error_leaf() {
    let module = parse(")\n");
    insta::assert_snapshot!(module.dump(), @r#"
    file_input
      error_leaf ")" @1:0
      newline "\n" @1:1
      endmarker "" @2:0
    "#);
    assert!(module.error_statements().is_empty());
}

#[test]
fn test_broken_simple_stmt_keeps_finished_part() {
    let module = parse("a; )\n");
    insta::assert_snapshot!(module.dump(), @r#"
    file_input
      simple_stmt
        expr_stmt
          name "a" @1:0
        operator ";" @1:1
      error_leaf ")" @1:3
      newline "\n" @1:4
      endmarker "" @2:0
    "#);
}

#[test]
fn test_unexpected_indent_drops_matching_dedent() {
    let module = parse("  x\ny\n");
    let tree = module.tree();
    let types: Vec<&str> = tree.children(module.root()).iter().map(|c| tree.type_name(*c)).collect();
    assert_eq!(types, ["simple_stmt", "simple_stmt", "endmarker"]);
    assert!(
        tree.leaves(module.root())
            .iter()
            .all(|leaf| !matches!(tree.type_name(*leaf), "error_leaf" | "indent" | "dedent"))
    );
}

#[test]
fn test_recovery_inside_function_body() {
    let source = "def f():\n    x =\n    y = 1\n";
    let module = parse(source);
    assert_eq!(module.code(), source);
    assert!(!module.error_statements().is_empty());
    let tree = module.tree();
    let y = module.name_for_position(Position::new(3, 4)).unwrap();
    assert_eq!(tree.value(y), "y");
}

#[test]
fn test_statement_for_position() {
    let source = "import os\ndef f(a):\n    return a\n";
    let module = parse(source);
    let tree = module.tree();

    let first = module.statement_for_position(Position::new(1, 3)).unwrap();
    assert_eq!(tree.type_name(first), "import_name");

    let ret = module.statement_for_position(Position::new(3, 10)).unwrap();
    assert_eq!(tree.type_name(ret), "return_stmt");

    // On the `def` keyword: a direct child of funcdef.
    let keyword = module.statement_for_position(Position::new(2, 1)).unwrap();
    assert_eq!(tree.type_name(keyword), "keyword");
}

#[test]
fn test_leaf_for_position() {
    let module = parse("foo.bar  \n");
    let tree = module.tree();

    let leaf = module.leaf_for_position(Position::new(1, 3), false).unwrap();
    assert_eq!(tree.value(leaf), "foo", "boundary goes to the earlier leaf");

    let leaf = module.leaf_for_position(Position::new(1, 5), false).unwrap();
    assert_eq!(tree.value(leaf), "bar");

    // Inside the whitespace before the newline.
    assert_eq!(module.leaf_for_position(Position::new(1, 8), false), None);
    let newline = module.leaf_for_position(Position::new(1, 8), true).unwrap();
    assert_eq!(tree.type_name(newline), "newline");

    assert_eq!(module.leaf_for_position(Position::new(9, 0), true), None);
    assert_eq!(module.leaf_for_position(Position::new(0, 0), true), None);
}

#[test]
fn test_name_for_position_skips_keywords() {
    let module = parse("from os import path\n");
    assert_eq!(module.name_for_position(Position::new(1, 1)), None);
    let name = module.name_for_position(Position::new(1, 19)).unwrap();
    assert_eq!(module.tree().value(name), "path");
    let previous = module.previous_leaf(name).unwrap();
    assert_eq!(module.tree().value(previous), "import");
}

#[test]
fn test_input_after_endmarker_is_rejected() {
    let grammar = Grammar::python().unwrap();
    let mut parser = Parser::new(&grammar);
    let end = Token::new(TokenType::EndMarker, "", "", Position::new(1, 0));
    assert_eq!(parser.add_token(end.clone()), Ok(true));
    assert!(parser.is_done());
    assert!(matches!(parser.add_token(end), Err(ParseError::TooMuchInput { .. })));
}

#[test]
fn test_into_parts_exposes_open_frames() {
    let grammar = Grammar::python().unwrap();
    let mut parser = Parser::new(&grammar);
    for token in tokenize("import os") {
        if token.kind == TokenType::EndMarker {
            break;
        }
        parser.add_token(token).unwrap();
    }
    let (stack, tree) = parser.into_parts();
    let rules: Vec<&str> = stack.iter().map(|frame| grammar.symbol_name(frame.symbol())).collect();
    assert_eq!(
        rules,
        [
            "file_input",
            "stmt",
            "simple_stmt",
            "small_stmt",
            "import_stmt",
            "import_name",
            "dotted_as_names",
            "dotted_as_name",
            "dotted_name"
        ]
    );
    let top = stack.last().unwrap();
    assert_eq!(tree.value(top.children()[0]), "os");
}
