//! End-to-end terminal sessions
//!
//! Each test boots a kernel, opens a shell and types lines the way a user
//! would, checking the rendered output and the resulting tree.

use pretty_assertions::assert_eq;
use wanderer::fs::NodeRef;
use wanderer::{CompletionOutcome, HistoryLine, Kernel, Shell};

fn session() -> (Kernel, Shell) {
    let mut kernel = Kernel::builder().build().unwrap();
    kernel.boot().unwrap();
    let shell = Shell::new(&kernel);
    (kernel, shell)
}

fn segs(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn children(kernel: &Kernel, path: &str) -> Vec<String> {
    kernel
        .fs()
        .find_folder(&segs(path))
        .unwrap()
        .files
        .iter()
        .map(|node| node.name().to_string())
        .collect()
}

#[test]
fn mkdir_twice_gets_numbered_name() {
    let (mut kernel, mut shell) = session();
    shell.execute_line(&mut kernel, "mkdir Docs").unwrap();
    shell.execute_line(&mut kernel, "mkdir Docs").unwrap();

    assert_eq!(children(&kernel, "/home/user"), vec!["Docs", "Docs (1)"]);
}

#[test]
fn rm_missing_names_the_full_path() {
    let (mut kernel, mut shell) = session();
    let err = shell.execute_line(&mut kernel, "rm missing").unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("rm:"), "{message}");
    assert!(message.contains("/home/user/missing"), "{message}");
}

#[test]
fn ls_of_empty_folder_is_a_single_space() {
    let (mut kernel, mut shell) = session();
    shell.execute_line(&mut kernel, "mkdir empty").unwrap();

    assert_eq!(shell.execute_line(&mut kernel, "ls empty").unwrap(), " ");
}

#[test]
fn cp_folder_requires_recursive_flag() {
    let (mut kernel, mut shell) = session();
    shell.execute_line(&mut kernel, "mkdir src").unwrap();

    let err = shell.execute_line(&mut kernel, "cp src dst").unwrap_err();
    assert!(err.to_string().contains("-r"));
    assert_eq!(children(&kernel, "/home/user"), vec!["src"]);

    shell.execute_line(&mut kernel, "cp -r src dst").unwrap();
    assert_eq!(children(&kernel, "/home/user"), vec!["src", "dst"]);
}

#[test]
fn cd_completion_offers_folders_only() {
    let (mut kernel, mut shell) = session();
    shell.execute_line(&mut kernel, "mkdir Documents").unwrap();
    shell.execute_line(&mut kernel, "touch doc.txt").unwrap();

    let outcome = shell.tab(&kernel, "cd doc", 6);
    assert_eq!(
        outcome,
        CompletionOutcome::Replaced {
            line: "cd Documents/".to_string(),
            cursor: 13,
        }
    );
}

#[test]
fn file_lifecycle() {
    let (mut kernel, mut shell) = session();
    for line in [
        "mkdir notes",
        "touch notes/todo.txt",
        "cp notes/todo.txt /tmp",
        "mv /tmp/todo.txt /tmp/done.txt",
    ] {
        shell.execute_line(&mut kernel, line).unwrap();
    }

    assert_eq!(children(&kernel, "/tmp"), vec!["done.txt"]);
    assert_eq!(
        shell.execute_line(&mut kernel, "ls notes").unwrap(),
        "todo.txt"
    );

    shell.execute_line(&mut kernel, "rm -r notes").unwrap();
    assert!(children(&kernel, "/home/user").is_empty());
}

#[test]
fn echo_expands_variables_and_escapes() {
    let (mut kernel, mut shell) = session();
    shell.execute_line(&mut kernel, "export GREETING=hi").unwrap();

    let output = shell
        .execute_line(&mut kernel, "echo $GREETING\\tthere")
        .unwrap();
    assert_eq!(output, "hi\tthere\n");
}

#[test]
fn root_session_owns_what_it_creates() {
    let (mut kernel, mut shell) = session();
    shell.execute_line(&mut kernel, "sudo su").unwrap();
    assert_eq!(shell.prompt(), "root@zutiOS:/home/user#");

    shell.execute_line(&mut kernel, "touch /tmp/system.log").unwrap();
    match kernel.fs().find_node(&segs("/tmp/system.log")).unwrap() {
        NodeRef::File(file) => assert_eq!(file.owner, "root"),
        NodeRef::Folder(_) => panic!("expected a file"),
    }

    shell.execute_line(&mut kernel, "exit").unwrap();
    assert_eq!(shell.prompt(), "user@zutiOS:~$");
    assert!(shell.is_alive());
}

#[test]
fn errors_do_not_end_the_session() {
    let (mut kernel, mut shell) = session();
    shell.submit(&mut kernel, "nosuchcommand");
    shell.submit(&mut kernel, "pwd");

    let lines = shell.lines();
    assert!(matches!(
        &lines[1],
        HistoryLine::Error(text) if text == "nosuchcommand: command not found"
    ));
    assert!(matches!(
        lines.last(),
        Some(HistoryLine::Output(text)) if text.trim_end() == "/home/user"
    ));
}

#[test]
fn history_recall_clamps_at_both_ends() {
    let (mut kernel, mut shell) = session();
    shell.submit(&mut kernel, "pwd");
    shell.submit(&mut kernel, "ls");

    assert_eq!(shell.history_up(), "ls");
    assert_eq!(shell.history_up(), "pwd");
    assert_eq!(shell.history_up(), "pwd");
    assert_eq!(shell.history_down(), "ls");
    assert_eq!(shell.history_down(), "");
    assert_eq!(shell.history_down(), "");
}
