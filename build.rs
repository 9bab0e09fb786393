use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    let version = Command::new("git")
        .args(["describe", "--tags", "--long"])
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|rev| rev.trim().to_owned())
        .filter(|rev| !rev.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned());
    println!("cargo:rustc-env=TRANSTREE_VERSION={}", version);
}
