use argbind_core::{
    CliError, CommandGroup, CommandSchema, PropertyDescriptor, Registry, Tokens, Value,
    ValueParser, ValueType,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_program() -> Registry {
    let mut registry = Registry::new();
    registry
        .add(
            CommandSchema::builder("Help")
                .property(
                    PropertyDescriptor::flag("Help")
                        .aliases(["--help", "-h"])
                        .mandatory(),
                )
                .build()
                .unwrap(),
        )
        .unwrap()
        .add(
            CommandSchema::builder("Test")
                .property(
                    PropertyDescriptor::scalar("Mode", ValueParser::Text)
                        .aliases(["--mode", "-m"])
                        .mandatory(),
                )
                .property(PropertyDescriptor::collection("Keys", ValueParser::Text).alias("--key"))
                .property(
                    PropertyDescriptor::scalar("Value", ValueParser::Integer)
                        .alias("0")
                        .mandatory(),
                )
                .handler(|b| if b.integer("Value") == Some(42) { 0 } else { 1 })
                .build()
                .unwrap(),
        )
        .unwrap();
    registry
}

fn tag() -> PropertyDescriptor {
    PropertyDescriptor::flag("Tag").aliases(["tag", "0"]).mandatory()
}

fn tag_name() -> PropertyDescriptor {
    PropertyDescriptor::scalar("TagName", ValueParser::Text)
        .alias("1")
        .mandatory()
}

fn format() -> PropertyDescriptor {
    PropertyDescriptor::collection("Format", ValueParser::Text).alias("--format")
}

fn git() -> Registry {
    let flag = |name: &str, aliases: &[&str]| {
        PropertyDescriptor::flag(name).aliases(aliases.iter().copied())
    };
    let create = CommandSchema::new(
        "TagCreate",
        vec![
            tag(),
            flag("Annotate", &["--annotate", "-a"]),
            flag("Sign", &["--sign", "-s"]),
            flag("NoSign", &["--no-sign"]),
            PropertyDescriptor::scalar("SignKey", ValueParser::Text).aliases(["--local-user", "-u"]),
            flag("Force", &["--force", "-f"]),
            flag("Edit", &["--edit", "-e"]),
            PropertyDescriptor::collection("Message", ValueParser::Text).aliases(["--message", "-m"]),
            PropertyDescriptor::scalar("File", ValueParser::Text).aliases(["--file", "-F"]),
            tag_name(),
            PropertyDescriptor::scalar("CommitOrObject", ValueParser::Text).alias("2"),
        ],
    )
    .unwrap();
    let delete = CommandSchema::new(
        "TagDelete",
        vec![tag(), flag("Delete", &["--delete", "-d"]).mandatory(), tag_name()],
    )
    .unwrap();
    let color = ValueParser::Choice(vec!["always".into(), "never".into(), "auto".into()]);
    let list = CommandSchema::new(
        "TagList",
        vec![
            tag(),
            flag("List", &["--list", "-l"]).mandatory(),
            PropertyDescriptor::collection("Sort", ValueParser::Text).alias("--sort"),
            flag("IgnoreCase", &["--ignore-case", "-i"]),
            format(),
            PropertyDescriptor::scalar("Column", ValueParser::Text).alias("--column"),
            PropertyDescriptor::scalar("Color", color).alias("--color"),
        ],
    )
    .unwrap();
    let verify = CommandSchema::new(
        "TagVerify",
        vec![tag(), flag("Verify", &["--verify", "-v"]).mandatory(), format(), tag_name()],
    )
    .unwrap();

    let mut registry = Registry::new();
    registry
        .add_group(
            CommandGroup::new("tag")
                .command(create)
                .command(delete)
                .command(list)
                .command(verify),
        )
        .unwrap();
    registry
}

fn texts(values: &[Value]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn suggestions(registry: &Registry, args: &[&str]) -> Vec<String> {
    registry.complete(args.iter().copied()).into_iter().collect()
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[test]
fn test_cluster_and_long_option() {
    let tokens = Tokens::parse(["-abc", "--help"]);

    let texts: Vec<_> = tokens.iter().map(|t| t.text()).collect();
    assert_eq!(texts, ["-a", "-b", "-c", "--help"]);
    assert!(tokens.iter().all(|t| t.is_option()));
}

#[test]
fn test_end_options_marker_is_consumed_once() {
    let tokens = Tokens::parse(["-x", "--", "--", "-y", "z"]);

    assert_eq!(tokens.len(), 4);
    assert!(tokens[0].is_short_option());
    for token in tokens.iter().skip(1) {
        assert!(token.is_end_options(), "{token}");
    }
    assert_eq!(tokens[1].text(), "--");
    assert_eq!(tokens[1].value_type(), Some(ValueType::ValueEndOption));
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn test_mode_and_value() {
    let registry = test_program();

    let selected = registry.select_args(["--mode", "JUnit", "42"]).unwrap();
    assert_eq!(selected.schema().name(), "Test");
    assert_eq!(selected.bindings().text("Mode"), Some("JUnit"));
    assert_eq!(selected.bindings().integer("Value"), Some(42));
    assert_eq!(selected.run(), 0);

    assert_eq!(registry.run(["-m", "JUnit", "7"]).unwrap(), 1);
    assert_eq!(registry.select_args(["-h"]).unwrap().schema().name(), "Help");
}

#[test]
fn test_no_arguments_differs_from_invalid_usage() {
    let registry = test_program();

    let err = registry.select_args(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, CliError::NoArguments));

    let err = registry.select_args(["--mode", "JUnit"]).unwrap_err();
    match err {
        CliError::InvalidUsage { command_line } => assert_eq!(command_line, "--mode JUnit"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_end_options_marker_alone_is_no_arguments() {
    let registry = test_program();

    let err = registry.select_args(["--"]).unwrap_err();
    assert!(matches!(err, CliError::NoArguments), "{err}");
}

#[test]
fn test_repeated_collection_option() {
    let mut registry = test_program();
    let args = ["--mode", "JUnit", "--key", "k1", "--key", "k2", "42"];

    let selected = registry.select_args(args).unwrap();
    assert_eq!(texts(selected.bindings().many("Keys")), ["k1", "k2"]);

    registry.tolerate_duplicate_options(false);
    match registry.select_args(args).unwrap_err() {
        CliError::DuplicateOptions(options) => assert_eq!(options, ["--key"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_duplicates_checked_before_matching() {
    let mut registry = test_program();
    registry.tolerate_duplicate_options(false);

    let err = registry.select_args(["-h", "-h"]).unwrap_err();
    assert_eq!(err.to_string(), "duplicate options: -h");
}

#[test]
fn test_selection_is_deterministic() {
    let registry = git();
    let args = ["tag", "-d", "release/1.0.0"];

    for _ in 0..5 {
        let selected = registry.select_args(args).unwrap();
        assert_eq!(selected.schema().name(), "TagDelete");
    }
}

// ---------------------------------------------------------------------------
// Git tag
// ---------------------------------------------------------------------------

#[test]
fn test_git_tag_create() {
    let registry = git();

    let selected = registry
        .select_args(["tag", "-a", "release/1.0.0", "-m", "this is a message", "-f"])
        .unwrap();
    let bindings = selected.bindings();
    assert_eq!(selected.schema().name(), "TagCreate");
    assert!(bindings.flag("Tag"));
    assert!(bindings.flag("Annotate"));
    assert!(bindings.flag("Force"));
    assert!(!bindings.flag("Sign"));
    assert_eq!(bindings.text("TagName"), Some("release/1.0.0"));
    assert_eq!(texts(bindings.many("Message")), ["this is a message"]);
    assert!(!bindings.contains("CommitOrObject"));
}

#[test]
fn test_git_tag_list() {
    let registry = git();

    let selected = registry
        .select_args([
            "tag",
            "-l",
            "--column=hash",
            "--sort=date",
            "--format=%(refname:strip=2)",
            "--color=never",
        ])
        .unwrap();
    let bindings = selected.bindings();
    assert_eq!(selected.schema().name(), "TagList");
    assert!(bindings.flag("List"));
    assert_eq!(bindings.text("Column"), Some("hash"));
    assert_eq!(bindings.text("Color"), Some("never"));
    assert_eq!(texts(bindings.many("Sort")), ["date"]);
    assert_eq!(texts(bindings.many("Format")), ["%(refname:strip=2)"]);
}

#[test]
fn test_git_tag_list_rejects_unknown_color() {
    let registry = git();

    let err = registry
        .select_args(["tag", "-l", "--color", "sometimes"])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid value 'sometimes' for Color: expected one of: always, never, auto"
    );
}

#[test]
fn test_git_tag_delete_and_verify() {
    let registry = git();

    let delete = registry.select_args(["tag", "-d", "release/1.0.0"]).unwrap();
    assert_eq!(delete.schema().name(), "TagDelete");
    assert_eq!(delete.bindings().text("TagName"), Some("release/1.0.0"));

    let verify = registry
        .select_args(["tag", "-v", "--format=%(refname:strip=2)", "release/1.0.0"])
        .unwrap();
    assert_eq!(verify.schema().name(), "TagVerify");
    assert!(verify.bindings().flag("Verify"));
    assert_eq!(texts(verify.bindings().many("Format")), ["%(refname:strip=2)"]);
    assert_eq!(verify.bindings().text("TagName"), Some("release/1.0.0"));
}

#[test]
fn test_git_usage() {
    let registry = git();

    assert_eq!(
        registry.usage("git"),
        [
            "git tag [--annotate|-a] [--edit|-e] [--file|-F <file>] [--force|-f] \
             [--local-user|-u <local-user>] [--message|-m <message>...] [--no-sign] \
             [--sign|-s] <tagName> [<commitOrObject>]",
            "git tag --delete|-d <tagName>",
            "git tag --list|-l [--color <color>] [--column <column>] [--format <format>...] \
             [--ignore-case|-i] [--sort <sort>...]",
            "git tag --verify|-v [--format <format>...] <tagName>",
        ]
    );
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn test_complete_options_across_group() {
    let registry = git();

    assert_eq!(suggestions(&registry, &["tag", "--l"]), ["--list", "--local-user"]);
    assert_eq!(suggestions(&registry, &["t"]), ["tag"]);
    assert!(suggestions(&registry, &["x"]).is_empty());
}

#[test]
fn test_complete_choice_values() {
    let registry = git();

    assert_eq!(
        suggestions(&registry, &["tag", "-l", "--color", "a"]),
        ["always", "auto"]
    );
    assert_eq!(
        suggestions(&registry, &["tag", "-l", "--color"]),
        ["always", "auto", "never"]
    );
}

#[test]
fn test_complete_after_full_command() {
    let registry = git();

    let offered = suggestions(&registry, &["tag", "-d", "v1"]);
    assert!(offered.is_empty(), "{offered:?}");

    let offered = suggestions(&registry, &["tag", "-v", "v1"]);
    assert_eq!(offered, ["--format"]);
}

#[test]
fn test_complete_is_idempotent() {
    let registry = git();
    let args = ["tag", "-l", "--s"];

    let first = registry.complete(args);
    for _ in 0..3 {
        assert_eq!(registry.complete(args), first);
    }
    assert_eq!(first.into_iter().collect::<Vec<_>>(), ["--sort"]);
}
