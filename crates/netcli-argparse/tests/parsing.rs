use netcli_argparse::{ArgParser, NodeId, NodeRef, ParseError, ParseOutcome};

fn app<'a>() -> ArgParser<'a> {
    let mut ap = ArgParser::new(Some("Usage: app [OPTIONS] [COMMAND]"), Some("app 2.0"));
    ap.add_flag("a").unwrap();
    ap.add_flag("b").unwrap();
    ap.add_str("c name", "default").unwrap();
    ap.add_int("n count", 10).unwrap();
    ap.add_float("r ratio", 1.5).unwrap();
    ap.add_str_list("tags", true).unwrap();
    ap.add_int_list("i", false).unwrap();
    ap
}

#[test]
fn registration_then_empty_parse_keeps_defaults() {
    let argv = ["app"];
    let mut ap = app();
    assert_eq!(ap.parse(&argv).unwrap(), ParseOutcome::Parsed);

    assert!(!ap.get_flag("a").unwrap());
    assert_eq!(ap.get_str("name").unwrap(), "default");
    assert_eq!(ap.get_int("count").unwrap(), 10);
    assert_eq!(ap.get_float("ratio").unwrap(), 1.5);
    assert!(ap.get_str_list("tags").unwrap().is_empty());
    assert!(!ap.found("c").unwrap());
    assert!(!ap.has_args());
    assert_eq!(ap.len_args(), 0);
    assert!(!ap.has_cmd());
    assert_eq!(ap.cmd_name(), None);
}

#[test]
fn bundled_short_flags_with_trailing_value_option() {
    let argv = ["app", "-abc", "val1", "val2"];
    let mut ap = app();
    ap.parse(&argv).unwrap();

    assert!(ap.get_flag("a").unwrap());
    assert!(ap.get_flag("b").unwrap());
    assert_eq!(ap.get_str("c").unwrap(), "val1");
    assert_eq!(ap.get_args(), vec!["val2"]);
}

#[test]
fn equals_and_separate_forms_are_equivalent() {
    let split = ["app", "--name", "x", "--count", "-4"];
    let joined = ["app", "--name=x", "--count=-4"];

    let mut a = app();
    a.parse(&split).unwrap();
    let mut b = app();
    b.parse(&joined).unwrap();

    for name in ["name", "count"] {
        assert_eq!(a.option(name).unwrap(), b.option(name).unwrap(), "{name}");
    }
    assert_eq!(a.get_int("n").unwrap(), -4);
}

#[test]
fn greedy_list_and_terminator() {
    let argv = ["app", "--tags", "x", "y", "z", "--", "w"];
    let mut ap = app();
    ap.parse(&argv).unwrap();

    assert_eq!(ap.get_str_list("tags").unwrap(), vec!["x", "y", "z"]);
    assert_eq!(ap.get_args(), vec!["w"]);
}

#[test]
fn greedy_list_stops_at_next_flag() {
    let argv = ["app", "--tags", "x", "-5", "-a", "rest"];
    let mut ap = app();
    ap.parse(&argv).unwrap();

    assert_eq!(ap.get_str_list("tags").unwrap(), vec!["x", "-5"]);
    assert!(ap.get_flag("a").unwrap());
    assert_eq!(ap.get_args(), vec!["rest"]);
}

#[test]
fn dash_and_negative_numbers_never_become_options() {
    let argv = ["app", "-", "-5", "-i", "-7"];
    let mut ap = app();
    ap.parse(&argv).unwrap();

    assert_eq!(ap.get_args(), vec!["-", "-5"]);
    assert_eq!(ap.get_int_list("i").unwrap(), vec![-7]);
}

#[test]
fn command_receives_remaining_tokens() {
    let argv = ["app", "push", "--force", "file.txt"];
    let mut ap = app();
    let push = ap.add_cmd(NodeId::ROOT, "push", "Usage: app push", None).unwrap();
    ap.node_mut(push).add_flag("force").unwrap();
    ap.parse(&argv).unwrap();

    assert!(ap.has_cmd());
    assert_eq!(ap.cmd_name(), Some("push"));

    let cmd = ap.root().command().expect("push matched");
    assert_eq!(cmd.id(), push);
    assert!(cmd.get_flag("force").unwrap());
    assert_eq!(cmd.get_args(), vec!["file.txt"]);
    assert_eq!(cmd.parent().map(|p| p.id()), Some(NodeId::ROOT));
    assert!(ap.root().parent().is_none());
}

#[test]
fn nested_commands_recurse() {
    let argv = ["app", "remote", "add", "-u", "origin", "url"];
    let mut ap = app();
    let remote = ap.add_cmd(NodeId::ROOT, "remote", "remote help", None).unwrap();
    let add = ap.add_cmd(remote, "add", "add help", None).unwrap();
    ap.node_mut(add).add_flag("u").unwrap();
    ap.parse(&argv).unwrap();

    let remote = ap.root().command().unwrap();
    assert_eq!(remote.cmd_name(), Some("add"));
    let add = remote.command().unwrap();
    assert!(add.get_flag("u").unwrap());
    assert_eq!(add.get_args(), vec!["origin", "url"]);
    assert_eq!(
        add.parent().and_then(|p| p.parent()).map(|p| p.id()),
        Some(NodeId::ROOT)
    );

    let argv = ["app", "remote", "help", "add"];
    let mut ap2 = app();
    let remote = ap2.add_cmd(NodeId::ROOT, "remote", "remote help", None).unwrap();
    ap2.add_cmd(remote, "add", "add help", None).unwrap();
    assert_eq!(
        ap2.parse(&argv).unwrap(),
        ParseOutcome::Help("add help".to_string())
    );
}

#[test]
fn command_aliases_record_the_typed_name() {
    let argv = ["app", "rm", "x"];
    let mut ap = app();
    ap.add_cmd(NodeId::ROOT, "remove rm", "", None).unwrap();
    ap.parse(&argv).unwrap();
    assert_eq!(ap.cmd_name(), Some("rm"));
}

#[test]
fn callback_sees_command_and_parent() {
    fn run(cmd: NodeRef<'_, '_>) -> anyhow::Result<()> {
        let parent = cmd.parent().expect("command has a parent");
        anyhow::ensure!(parent.get_flag("a")?, "parent flag not parsed yet");
        anyhow::ensure!(cmd.get_arg(0) == Some("eth0"), "wrong argument");
        Ok(())
    }

    let argv = ["app", "-a", "show", "eth0"];
    let mut ap = app();
    ap.add_cmd(NodeId::ROOT, "show", "", Some(run)).unwrap();
    assert_eq!(ap.parse(&argv).unwrap(), ParseOutcome::Parsed);
}

#[test]
fn positional_number_coercion() {
    let argv = ["app", "10", "20"];
    let mut ap = app();
    ap.parse(&argv).unwrap();
    assert_eq!(ap.get_args_as_ints().unwrap(), vec![10, 20]);
    assert_eq!(ap.get_args_as_floats().unwrap(), vec![10.0, 20.0]);

    let argv = ["app", "10", "x"];
    let mut ap = app();
    ap.parse(&argv).unwrap();
    let err = ap.get_args_as_ints().unwrap_err();
    assert!(matches!(err, ParseError::NumericInvalidFormat { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn help_and_version_outcomes() {
    let mut ap = app();
    assert_eq!(
        ap.parse(&["app", "--version"]).unwrap(),
        ParseOutcome::Version("app 2.0".to_string())
    );

    let mut ap = app();
    let push = ap.add_cmd(NodeId::ROOT, "push", "push help", None).unwrap();
    assert_eq!(
        ap.parse(&["app", "help", "push"]).unwrap(),
        ParseOutcome::Help("push help".to_string())
    );
    // commands have no version text of their own
    assert!(ap.node(push).version().is_none());
    let err = ap.parse(&["app", "push", "--version"]).unwrap_err();
    assert_eq!(err.to_string(), "--version is not a recognised option");
}

#[test]
fn programmatic_values_before_and_after_parse() {
    let argv = ["app", "--tags", "a"];
    let mut ap = app();
    ap.set_str("tags", "pre").unwrap();
    ap.parse(&argv).unwrap();
    ap.set_str("tags", "post".to_string()).unwrap();
    assert_eq!(ap.get_str_list("tags").unwrap(), vec!["pre", "a", "post"]);

    ap.clear_list("tags").unwrap();
    assert_eq!(ap.len_list("tags").unwrap(), 0);
    assert!(ap.found("tags").unwrap());
}
