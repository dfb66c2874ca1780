//! End-to-end scenarios and universal properties from `spec.md` §8.

use rexx_core::error::ErrorKind;
use rexx_core::value::Value;
use test_utils::Harness;

#[test]
fn persistence_across_commands() {
    let mut h = Harness::new();
    h.run("LET x = 10").unwrap();
    h.run("LET y = 20").unwrap();
    h.run("LET sum = x + y").unwrap();

    assert_eq!(h.var("x"), Some(Value::Number(10.0)));
    assert_eq!(h.var("y"), Some(Value::Number(20.0)));
    assert_eq!(h.var("sum"), Some(Value::Number(30.0)));
}

#[test]
fn arithmetic_via_say() {
    let mut h = Harness::new();
    h.run("LET r = 5 + 3\nSAY r").unwrap();
    assert_eq!(h.output(), vec!["8".to_owned()]);
}

#[test]
fn compound_nesting() {
    let mut h = Harness::new();
    h.run("LET data.user.name = \"Alice\"\nLET data.user.age = 30").unwrap();

    assert_eq!(h.var("data.user.name"), None); // `var` only looks at top-level stems
    let Some(Value::Compound(data)) = h.var("data") else {
        panic!("expected DATA to be a Compound");
    };
    let Some(Value::Compound(user)) = data.get("USER") else {
        panic!("expected DATA.USER to be a Compound");
    };
    assert_eq!(user.get("NAME"), Some(&Value::str("Alice")));
    assert_eq!(user.get("AGE"), Some(&Value::Number(30.0)));
}

#[test]
fn default_to_name() {
    let mut h = Harness::new();
    h.run("SAY undefinedVar").unwrap();
    assert_eq!(h.output(), vec!["undefinedVar".to_owned()]);
}

#[test]
fn if_block() {
    let mut h = Harness::new();
    h.run("LET x = 10\nIF x > 5 THEN\nSAY \"x is greater than 5\"\nENDIF").unwrap();
    assert_eq!(h.output(), vec!["x is greater than 5".to_owned()]);
}

#[test]
fn do_loop() {
    let mut h = Harness::new();
    h.run("DO i = 1 TO 3\nSAY \"Count: \" || i\nEND").unwrap();
    assert_eq!(
        h.output(),
        vec!["Count: 1".to_owned(), "Count: 2".to_owned(), "Count: 3".to_owned()]
    );
}

#[test]
fn error_continuation() {
    let mut h = Harness::new();
    assert!(h.run("LET x = ").is_err());
    h.run("LET y = 42").unwrap();
    assert_eq!(h.var("y"), Some(Value::Number(42.0)));
}

#[test]
fn do_loop_variable_overshoots_by_one_past_the_end() {
    let mut h = Harness::new();
    h.run("DO i = 1 TO 3\nEND").unwrap();
    assert_eq!(h.var("i"), Some(Value::Number(4.0)));
}

#[test]
fn do_loop_variable_restores_prior_binding() {
    let mut h = Harness::new();
    h.run("LET i = 99\nDO i = 1 TO 3\nEND").unwrap();
    assert_eq!(h.var("i"), Some(Value::Number(99.0)));
}

#[test]
fn select_executes_at_most_one_arm() {
    let mut h = Harness::new();
    h.run("LET x = 2\nSELECT\nWHEN x = 1 THEN\nSAY \"one\"\nWHEN x = 2 THEN\nSAY \"two\"\nOTHERWISE\nSAY \"other\"\nEND")
        .unwrap();
    assert_eq!(h.output(), vec!["two".to_owned()]);
}

#[test]
fn select_with_no_match_and_no_otherwise_completes_silently() {
    let mut h = Harness::new();
    h.run("LET x = 9\nSELECT\nWHEN x = 1 THEN\nSAY \"one\"\nEND").unwrap();
    assert!(h.output().is_empty());
}

#[test]
fn unassigned_compound_tail_defaults_to_upper_dotted_name() {
    let mut h = Harness::new();
    h.run("LET a.b = 1\nSAY a.b.d").unwrap();
    assert_eq!(h.output(), vec!["A.B.D".to_owned()]);
}

#[test]
fn leave_exits_the_nearest_loop_early() {
    let mut h = Harness::new();
    h.run("DO i = 1 TO 5\nIF i = 3 THEN\nLEAVE\nENDIF\nSAY i\nEND").unwrap();
    assert_eq!(h.output(), vec!["1".to_owned(), "2".to_owned()]);
}

#[test]
fn iterate_skips_the_rest_of_the_current_iteration() {
    let mut h = Harness::new();
    h.run("DO i = 1 TO 4\nIF i = 2 THEN\nITERATE\nENDIF\nSAY i\nEND").unwrap();
    assert_eq!(h.output(), vec!["1".to_owned(), "3".to_owned(), "4".to_owned()]);
}

#[test]
fn command_catch_all_dispatches_to_address_target_with_interpolation() {
    let mut h = Harness::new();
    h.run("LET name = \"world\"\ngreet {name}").unwrap();
    assert_eq!(h.commands(), vec!["greet world".to_owned()]);
}

#[test]
fn do_while_respects_the_condition() {
    let mut h = Harness::new();
    h.run("LET i = 0\nDO WHILE i < 3\nSAY i\ni = i + 1\nEND").unwrap();
    assert_eq!(h.output(), vec!["0".to_owned(), "1".to_owned(), "2".to_owned()]);
}

#[test]
fn do_over_a_string_iterates_its_characters() {
    let mut h = Harness::new();
    h.run("DO c OVER \"ab\"\nSAY c\nEND").unwrap();
    assert_eq!(h.output(), vec!["a".to_owned(), "b".to_owned()]);
}

#[test]
fn signal_raises_a_target_label_not_found_error() {
    let mut h = Harness::new();
    let err = h.run("SIGNAL somewhere").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Signal);
}

#[test]
fn signal_aborts_remaining_clauses() {
    let mut h = Harness::new();
    assert!(h.run("SAY \"before\"\nSIGNAL somewhere\nSAY \"after\"").is_err());
    assert_eq!(h.output(), vec!["before".to_owned()]);
}
