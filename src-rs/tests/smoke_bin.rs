use std::process::Command;

fn run_smoke() -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_smoke"))
        .env_remove("RUST_LOG")
        .output()
        .expect("smoke binary runs")
}

#[test]
fn prints_both_results_and_exits_cleanly() {
    let output = run_smoke();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "Basic test result: success (no tool calls)\n\
         \n\
         Structured test result: MathResult { answer: 0, explanation: \"a\" }\n"
    );
}

#[test]
fn output_is_stable_across_runs() {
    let first = run_smoke().stdout;
    assert_eq!(run_smoke().stdout, first);
}
