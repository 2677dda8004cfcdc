use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn tokenize_prints_one_token_per_line() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("tokenize").arg("a && !b");

    cmd.assert()
        .success()
        .stdout("<LIT:a>\n<AND:&&>\n<EXCL:!>\n<LIT:b>\n");
}

#[test]
fn parse_as_sexp() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("parse")
        .arg("usr1 || (!usr2 && @group)")
        .arg("--format")
        .arg("sexp");

    cmd.assert().success().stdout(
        "Or(Literal(usr1), Subexpr(And(Not(Literal(usr2)), InGroup(Literal(group)))))\n",
    );
}

#[test]
fn parse_defaults_to_treeviz() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("parse").arg("!a");

    cmd.assert()
        .success()
        .stdout("⧉ Root\n└─ ⊳ Not\n  └─ ◦ Literal a\n");
}

#[test]
fn parse_as_json() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("parse").arg("a || b").arg("-f").arg("json");

    let output_pred = predicate::str::contains("\"node_type\": \"Or\"")
        .and(predicate::str::contains("\"fixing\": \"infix\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn parse_with_grammar_file() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("parse")
        .arg("c ? a : b!")
        .arg("--grammar")
        .arg(fixture_path("ternary.toml"))
        .arg("--format")
        .arg("sexp");

    cmd.assert()
        .success()
        .stdout("Cond(Literal(c), Literal(a), Fact(Literal(b)))\n");
}

#[test]
fn parse_error_exits_with_message() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("parse").arg("(a");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with(
            "Error: Unmatched opening token <OPENP> for wrapping operator Subexpr",
        ));
}

#[test]
fn unknown_format_is_an_error() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("parse").arg("a").arg("--format").arg("xml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error: Unknown format 'xml'"));
}

#[test]
fn check_lists_the_default_grammar() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("check");

    let output_pred = predicate::str::contains("Grammar ifauth is valid")
        .and(predicate::str::contains("<SPC> pattern /\\s+/ (ignored)"))
        .and(predicate::str::contains(
            "Subexpr (wrap, nested, priority 1): <OPENP> <CLOSEP>",
        ))
        .and(predicate::str::contains(
            "Or (infix, arity variable, priority 5): <OR>",
        ));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn check_missing_grammar_file() {
    let mut cmd = cargo_bin_cmd!("grammar");
    cmd.arg("check")
        .arg("--grammar")
        .arg(fixture_path("does-not-exist.toml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error: Grammar configuration error"));
}
