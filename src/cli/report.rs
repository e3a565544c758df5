use super::error::HarnessError;
use minishell_tester::formats::tree::{self, Leaf, Node};
use std::path::Path;

pub fn print_fatal_error(error: &HarnessError) {
    let heading = format!("❌ {}", error.heading());
    let tree = Node(heading, vec![Leaf(vec![error.to_string()])]);

    eprint!("{}", tree::draw_tree(&tree)); // Already contains newline
}

pub fn print_report_saved(path: &Path) {
    println!();
    println!("Detailed results saved to {}", path.display());
}
