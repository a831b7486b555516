/// Wrap command output in a fenced code block so it renders as literal text.
///
/// The fence grows past any backtick run already present in the output, so
/// kubectl output containing "```" cannot terminate the block early.
pub fn fenced_code_block(text: &str) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}\n{text}\n{fence}")
}
