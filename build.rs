use std::process::Command;

fn main() {
    let version = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            let s = String::from_utf8_lossy(&o.stdout).trim().to_string();
            s.strip_prefix('v').unwrap_or(&s).to_string()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").into());

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rustc-env=TASKBOARD_VERSION={version}");
}
